use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub const MIN_CHANNEL_LEN: usize = 4;
pub const MAX_CHANNEL_LEN: usize = 25;

pub const GAME_OFFLINE: &str = "Offline";
pub const GAME_ERROR: &str = "Error";

/// A normalized channel login: 4-25 ASCII alphanumerics or underscores, lower case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChannelId(String);

impl ChannelId {
    /// Normalize and validate a raw identifier, returning `None` when it has the wrong shape.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let valid_len = (MIN_CHANNEL_LEN..=MAX_CHANNEL_LEN).contains(&trimmed.len());
        let valid_chars = trimmed
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');

        if valid_len && valid_chars {
            Some(Self(trimmed.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ChannelId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid channel identifier '{}'", value))
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

/// Resolved state of one channel at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStatus {
    pub channel: ChannelId,
    #[serde(default)]
    pub is_live: bool,
    #[serde(default = "default_viewers")]
    pub viewers: String,
    #[serde(default = "default_game")]
    pub game: String,
    /// Signed HLS endpoint; empty when the token exchange failed.
    #[serde(rename = "m3u8_url", default)]
    pub playback_url: String,
    #[serde(default)]
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChannelStatus {
    /// An offline record with every field at its default.
    pub fn offline(channel: ChannelId, profile_url: String) -> Self {
        Self {
            channel,
            is_live: false,
            viewers: default_viewers(),
            game: default_game(),
            playback_url: String::new(),
            profile_url,
            error: None,
        }
    }

    pub fn has_playback_url(&self) -> bool {
        !self.playback_url.is_empty()
    }
}

fn default_viewers() -> String {
    "0".to_string()
}

fn default_game() -> String {
    GAME_OFFLINE.to_string()
}

/// The records of one discovery run plus the time they were generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub streams: Vec<ChannelStatus>,
}

impl ResultSet {
    pub fn new(streams: Vec<ChannelStatus>) -> Self {
        Self {
            last_updated: crate::util::time::now(),
            streams,
        }
    }

    pub fn live(&self) -> impl Iterator<Item = &ChannelStatus> {
        self.streams.iter().filter(|s| s.is_live)
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    crate::util::time::parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", raw)))
}

/// Format a count with `,` thousands separators.
pub fn format_viewers(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
