use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};

use crate::channel::{ChannelStatus, ResultSet};
use crate::util::time::format_header;

pub const FULL_PLAYLIST_FILE: &str = "twitch_streams.m3u8";
pub const SIMPLE_PLAYLIST_FILE: &str = "twitch_simple.m3u8";
pub const COMBINED_PLAYLIST_FILE: &str = "twitch_all.m3u8";

const GROUP_TITLE: &str = "Twitch";

/// Keep a value on one line inside an `#EXTINF` entry.
fn single_line(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

fn escape_attr(value: &str) -> String {
    single_line(value).replace('"', "'")
}

fn playable_live(result: &ResultSet) -> impl Iterator<Item = &ChannelStatus> {
    result.live().filter(|s| s.has_playback_url())
}

/// Generate the full playlist: live channels with metadata.
///
/// The generation time is passed in so output is deterministic.
pub fn generate_full(result: &ResultSet, generated: DateTime<Utc>) -> String {
    let live_count = result.live_count();

    let mut lines = vec![
        "#EXTM3U".to_string(),
        format!("# Generated: {}", generated.to_rfc3339()),
        format!("# Source Last Updated: {}", result.last_updated.to_rfc3339()),
        format!("# Total Live Streams: {}", live_count),
        String::new(),
    ];

    for stream in playable_live(result) {
        let channel = stream.channel.as_str();
        lines.push(format!(
            "#EXTINF:-1 tvg-id=\"{id}\" tvg-name=\"{id}\" tvg-logo=\"\" group-title=\"{group}\",{id} - {viewers} viewers - {game}",
            id = escape_attr(channel),
            group = GROUP_TITLE,
            viewers = single_line(&stream.viewers),
            game = single_line(&stream.game),
        ));
        lines.push(stream.playback_url.clone());
        lines.push(String::new());
    }

    if live_count == 0 {
        lines.push("# No live streams currently available".to_string());
        lines.push("# Check back later or run the workflow again".to_string());
    }

    lines.join("\n")
}

/// Generate the simple playlist: live channels, name only.
pub fn generate_simple(result: &ResultSet, generated: DateTime<Utc>) -> String {
    let mut lines = vec![
        "#EXTM3U".to_string(),
        format!("# Twitch Live Streams - {}", format_header(&generated)),
        format!("# Live: {}/{}", result.live_count(), result.streams.len()),
        String::new(),
    ];

    for stream in playable_live(result) {
        lines.push(format!("#EXTINF:-1,{}", stream.channel));
        lines.push(stream.playback_url.clone());
    }

    lines.join("\n")
}

/// Generate the combined playlist: every channel with a URL, tagged live or offline.
pub fn generate_combined(result: &ResultSet, generated: DateTime<Utc>) -> String {
    let mut lines = vec![
        "#EXTM3U".to_string(),
        format!("# All Twitch Streams - {}", format_header(&generated)),
        format!("# Live: {}/{}", result.live_count(), result.streams.len()),
        String::new(),
    ];

    for stream in result.streams.iter().filter(|s| s.has_playback_url()) {
        let tag = if stream.is_live { "LIVE" } else { "OFFLINE" };
        lines.push(format!(
            "#EXTINF:-1,{} [{}] - {} viewers - {}",
            stream.channel,
            tag,
            single_line(&stream.viewers),
            single_line(&stream.game),
        ));
        lines.push(stream.playback_url.clone());
    }

    lines.join("\n")
}

/// Paths of the three playlists written by [`write_playlists`].
pub struct PlaylistPaths {
    pub full: PathBuf,
    pub simple: PathBuf,
    pub combined: PathBuf,
}

/**
    Write all three playlists into `output_dir`.
*/
pub fn write_playlists(
    result: &ResultSet,
    output_dir: &Path,
    generated: DateTime<Utc>,
) -> Result<PlaylistPaths> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| anyhow!("Failed to create output directory {:?}: {}", output_dir, e))?;

    let paths = PlaylistPaths {
        full: output_dir.join(FULL_PLAYLIST_FILE),
        simple: output_dir.join(SIMPLE_PLAYLIST_FILE),
        combined: output_dir.join(COMBINED_PLAYLIST_FILE),
    };

    for (path, content) in [
        (&paths.full, generate_full(result, generated)),
        (&paths.simple, generate_simple(result, generated)),
        (&paths.combined, generate_combined(result, generated)),
    ] {
        std::fs::write(path, content).map_err(|e| anyhow!("Failed to write {:?}: {}", path, e))?;
    }

    Ok(paths)
}
