use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, StatusCode};

use crate::error::ResolveError;

use super::endpoints::TwitchEndpoints;
use super::types::{ChannelId, format_viewers};

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Markers in the lower-cased profile page that indicate a live broadcast.
const LIVE_INDICATORS: &[&str] = &[
    r#""islivebroadcast":true"#,
    r#""isstreaming":true"#,
    r#"is_live":true"#,
];

/// What the profile page says about a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Liveness {
    pub is_live: bool,
    /// Formatted viewer count, when the page exposes one
    pub viewers: Option<String>,
    /// Category label, when the page exposes one
    pub game: Option<String>,
}

fn viewer_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"viewercount"?\s*:\s*(\d+)"#).expect("viewer regex should compile")
    })
}

fn game_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)"game"?\s*:\s*"([^"]+)""#).expect("game regex should compile")
    })
}

/**
    Fetch the public profile page and inspect it for live markers.

    A plain request with no token. Anything but a 200 is a failed probe.
*/
pub async fn probe_liveness(
    client: &Client,
    endpoints: &TwitchEndpoints,
    channel: &ChannelId,
) -> Result<Liveness, ResolveError> {
    let url = endpoints.profile_url(channel);

    let response = client
        .get(&url)
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(|e| ResolveError::request(&url, e))?;

    if response.status() != StatusCode::OK {
        return Err(ResolveError::Status {
            url,
            status: response.status().as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| ResolveError::body(&url, e))?;

    Ok(inspect_page(&body))
}

/**
    Heuristically read liveness from profile page markup.

    Viewer count and game are optional and independent of each other: a
    live marker without either still reports the channel as live.
*/
pub fn inspect_page(body: &str) -> Liveness {
    let lowered = body.to_lowercase();

    if !LIVE_INDICATORS.iter().any(|marker| lowered.contains(marker)) {
        return Liveness::default();
    }

    let viewers = viewer_regex()
        .captures(body)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .map(format_viewers);

    let game = game_regex()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    Liveness {
        is_live: true,
        viewers,
        game,
    }
}
