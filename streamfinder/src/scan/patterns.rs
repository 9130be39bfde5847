use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::channel::ChannelId;

/// Path segments on the site that name sections, not channels.
const RESERVED_PATHS: &[&str] = &[
    "directory",
    "downloads",
    "embed",
    "friends",
    "inventory",
    "jobs",
    "login",
    "messages",
    "p",
    "payments",
    "prime",
    "search",
    "settings",
    "signup",
    "subscriptions",
    "turbo",
    "videos",
    "wallet",
];

/// An identifier ends at the first character outside its ASCII alphabet.
const ID_END: &str = r"(?:[^A-Za-z0-9_]|$)";

fn channel_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // twitch.tv/<id>
            r"(?i:twitch\.tv/)([A-Za-z0-9_]{4,25})",
            // twitch.tv/embed/<id>
            r"(?i:twitch\.tv/embed/)([A-Za-z0-9_]{4,25})",
            // player.twitch.tv/?channel=<id>
            r"(?i:player\.twitch\.tv/\?channel=)([A-Za-z0-9_]{4,25})",
        ]
        .iter()
        .map(|p| Regex::new(&format!("{}{}", p, ID_END)).expect("channel pattern should compile"))
        .collect()
    })
}

/**
    Find every channel identifier referenced in a block of text.

    Matches are lower-cased, so differently-cased references to the same
    channel collapse into one entry. Input that contains no match, including
    binary garbage, yields an empty set.
*/
pub fn extract_channels(text: &str) -> BTreeSet<ChannelId> {
    let mut found = BTreeSet::new();
    extend_channels(&mut found, text);
    found
}

/// Add the channels referenced in `text` to an existing set.
pub fn extend_channels(found: &mut BTreeSet<ChannelId>, text: &str) {
    for pattern in channel_patterns() {
        for captures in pattern.captures_iter(text) {
            let Some(m) = captures.get(1) else {
                continue;
            };

            if let Some(id) = ChannelId::parse(m.as_str())
                && !RESERVED_PATHS.contains(&id.as_str())
            {
                found.insert(id);
            }
        }
    }
}
