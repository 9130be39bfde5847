use super::types::ChannelId;

pub const GQL_URL: &str = "https://gql.twitch.tv/gql";
pub const USHER_URL: &str = "https://usher.ttvnw.net/api/channel/hls";
pub const WEB_URL: &str = "https://twitch.tv";

/// Remote endpoints used when resolving a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwitchEndpoints {
    /// Token exchange (GraphQL) endpoint
    pub gql_url: String,
    /// Base for HLS manifest URLs
    pub usher_url: String,
    /// Base for public profile pages
    pub web_url: String,
}

impl TwitchEndpoints {
    /// Point every endpoint at one host, e.g. a local mock server.
    #[cfg(test)]
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            gql_url: format!("{}/gql", base),
            usher_url: format!("{}/usher", base),
            web_url: base.to_string(),
        }
    }

    pub fn profile_url(&self, channel: &ChannelId) -> String {
        format!("{}/{}", self.web_url.trim_end_matches('/'), channel)
    }
}

impl Default for TwitchEndpoints {
    fn default() -> Self {
        Self {
            gql_url: GQL_URL.to_string(),
            usher_url: USHER_URL.to_string(),
            web_url: WEB_URL.to_string(),
        }
    }
}
