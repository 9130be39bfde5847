use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;

use crate::error::ResolveError;
use crate::http::MOBILE_USER_AGENT;

use super::endpoints::TwitchEndpoints;
use super::types::ChannelId;

pub const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

/// Public anonymous client identifier used by the web player.
pub const ANONYMOUS_CLIENT_ID: &str = "kimne78kx3ncx6brgo4mv6wki5h1ko";

const OPERATION_NAME: &str = "PlaybackAccessToken";
const PERSISTED_QUERY_HASH: &str =
    "0828119ded1c13477966434e15800ff57ddacf13ba1911c129dc2200705b0712";

/// Signed credential pair returned by the token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackToken {
    pub value: String,
    pub signature: String,
}

#[derive(Debug, Deserialize)]
struct GqlResponse {
    data: Option<GqlData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GqlData {
    stream_playback_access_token: Option<GqlToken>,
}

#[derive(Debug, Deserialize)]
struct GqlToken {
    value: Option<String>,
    signature: Option<String>,
}

/**
    Exchange a channel login for a playback access token.
*/
pub async fn request_token(
    client: &Client,
    endpoints: &TwitchEndpoints,
    channel: &ChannelId,
) -> Result<PlaybackToken, ResolveError> {
    let url = endpoints.gql_url.as_str();
    let query = json!({
        "operationName": OPERATION_NAME,
        "variables": {
            "isLive": true,
            "login": channel.as_str(),
            "isVod": false,
            "vodID": "",
            "playerType": "site",
        },
        "extensions": {
            "persistedQuery": {
                "version": 1,
                "sha256Hash": PERSISTED_QUERY_HASH,
            },
        },
    });

    let response = client
        .post(url)
        .header(reqwest::header::USER_AGENT, MOBILE_USER_AGENT)
        .header(reqwest::header::ACCEPT, "application/vnd.twitchtv.v5+json")
        .header("Client-ID", ANONYMOUS_CLIENT_ID)
        .timeout(TOKEN_TIMEOUT)
        .json(&query)
        .send()
        .await
        .map_err(|e| ResolveError::request(url, e))?;

    let body = response
        .text()
        .await
        .map_err(|e| ResolveError::body(url, e))?;

    parse_token_response(&body)
}

fn parse_token_response(body: &str) -> Result<PlaybackToken, ResolveError> {
    let parsed: GqlResponse =
        serde_json::from_str(body).map_err(|e| ResolveError::InvalidJson(e.to_string()))?;

    let token = parsed
        .data
        .and_then(|d| d.stream_playback_access_token)
        .ok_or(ResolveError::MissingField("data.streamPlaybackAccessToken"))?;

    let value = token
        .value
        .ok_or(ResolveError::MissingField("streamPlaybackAccessToken.value"))?;
    let signature = token
        .signature
        .ok_or(ResolveError::MissingField("streamPlaybackAccessToken.signature"))?;

    Ok(PlaybackToken { value, signature })
}

/**
    Build the signed HLS manifest URL for a channel.
*/
pub fn playback_url(
    endpoints: &TwitchEndpoints,
    channel: &ChannelId,
    token: &PlaybackToken,
) -> Result<String, ResolveError> {
    let base = format!("{}/{}.m3u8", endpoints.usher_url.trim_end_matches('/'), channel);
    Url::parse_with_params(
        &base,
        &[
            ("sig", token.signature.as_str()),
            ("token", token.value.as_str()),
            ("allow_source", "true"),
        ],
    )
    .map(String::from)
    .map_err(|e| ResolveError::InvalidUrl(format!("{}: {}", base, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel() -> ChannelId {
        ChannelId::parse("alice").unwrap()
    }

    #[test]
    fn test_parse_token_response() {
        let body = r#"{"data":{"streamPlaybackAccessToken":{"value":"{\"channel\":\"alice\"}","signature":"abc123"}}}"#;
        let token = parse_token_response(body).unwrap();
        assert_eq!(token.value, r#"{"channel":"alice"}"#);
        assert_eq!(token.signature, "abc123");
    }

    #[test]
    fn test_parse_token_null_for_unknown_channel() {
        let body = r#"{"data":{"streamPlaybackAccessToken":null}}"#;
        let err = parse_token_response(body).unwrap_err();
        assert!(matches!(err, ResolveError::MissingField(_)));
    }

    #[test]
    fn test_parse_token_missing_signature() {
        let body = r#"{"data":{"streamPlaybackAccessToken":{"value":"v"}}}"#;
        let err = parse_token_response(body).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingField("streamPlaybackAccessToken.signature")
        ));
    }

    #[test]
    fn test_parse_token_not_json() {
        let err = parse_token_response("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, ResolveError::InvalidJson(_)));
    }

    #[test]
    fn test_playback_url_encodes_token() {
        let endpoints = TwitchEndpoints::default();
        let token = PlaybackToken {
            value: r#"{"channel":"alice","expires":1}"#.to_string(),
            signature: "deadbeef".to_string(),
        };

        let url = playback_url(&endpoints, &channel(), &token).unwrap();
        assert!(url.starts_with("https://usher.ttvnw.net/api/channel/hls/alice.m3u8?"));

        let parsed = Url::parse(&url).unwrap();
        let pairs: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("sig".to_string(), "deadbeef".to_string())));
        assert!(pairs.contains(&("token".to_string(), token.value.clone())));
    }

    #[tokio::test]
    async fn test_request_token_sends_persisted_query() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/gql"))
            .and(header("Client-ID", ANONYMOUS_CLIENT_ID))
            .and(body_partial_json(serde_json::json!({
                "operationName": "PlaybackAccessToken",
                "variables": { "login": "alice", "isLive": true },
                "extensions": { "persistedQuery": { "sha256Hash": PERSISTED_QUERY_HASH } },
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "streamPlaybackAccessToken": { "value": "tok", "signature": "sig" } }
            })))
            .mount(&server)
            .await;

        let endpoints = TwitchEndpoints::with_base(&server.uri());
        let token = request_token(&Client::new(), &endpoints, &channel())
            .await
            .unwrap();
        assert_eq!(token.value, "tok");
        assert_eq!(token.signature, "sig");
    }
}
