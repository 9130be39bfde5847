use std::collections::BTreeSet;
use std::time::Duration;

use futures::{StreamExt, stream};
use tokio::sync::watch;

use crate::config::Config;
use crate::scan::PageScanner;

use super::pacer::Pacer;
use super::resolver::StatusResolver;
use super::types::{ChannelId, ChannelStatus, ResultSet};

pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/**
    Discovery orchestrator.

    Collects identifiers from the seed pages and the default list, then
    resolves them in lexicographic order under a pacing policy:
    - `pace` bounds how often a new resolution may start
    - `concurrency` bounds how many resolutions are in flight (1 = sequential)
*/
pub struct Discovery {
    scanner: PageScanner,
    resolver: StatusResolver,
    pace: Duration,
    concurrency: usize,
}

impl Discovery {
    pub fn new(scanner: PageScanner, resolver: StatusResolver) -> Self {
        Self {
            scanner,
            resolver,
            pace: DEFAULT_PACE,
            concurrency: 1,
        }
    }

    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /**
        Build the identifier universe: every channel found on the seed
        pages plus the configured defaults. Ordered and deduplicated.
    */
    pub async fn collect_channels(&self, config: &Config) -> BTreeSet<ChannelId> {
        let mut channels = BTreeSet::new();

        for url in &config.target_urls {
            channels.extend(self.scanner.scan(url).await);
        }

        for raw in &config.default_channels {
            match ChannelId::parse(raw) {
                Some(id) => {
                    channels.insert(id);
                }
                None => tracing::warn!(channel = %raw, "skipping invalid default channel"),
            }
        }

        tracing::info!(count = channels.len(), "unique channels found");
        channels
    }

    /**
        Resolve every channel, in order, until done or shut down.

        Individual failures live in their records. Once `shutdown` flips to
        true no new resolution starts and the records gathered so far are
        returned.
    */
    pub async fn resolve_all(
        &self,
        channels: BTreeSet<ChannelId>,
        shutdown: watch::Receiver<bool>,
    ) -> ResultSet {
        let pacer = Pacer::new(self.pace);
        let total = channels.len();

        let streams: Vec<ChannelStatus> = stream::iter(channels)
            .map(|channel| {
                let pacer = &pacer;
                let mut shutdown = shutdown.clone();
                async move {
                    if *shutdown.borrow() {
                        return None;
                    }

                    tokio::select! {
                        _ = pacer.wait() => {}
                        _ = wait_for_shutdown(&mut shutdown) => return None,
                    }

                    Some(self.resolver.resolve(&channel).await)
                }
            })
            .buffered(self.concurrency)
            .filter_map(|status| async move { status })
            .collect()
            .await;

        if streams.len() < total {
            tracing::warn!(
                resolved = streams.len(),
                total,
                "discovery stopped early, keeping partial results"
            );
        }

        ResultSet::new(streams)
    }

    /// Collect channels, then resolve them all.
    pub async fn run(&self, config: &Config, shutdown: watch::Receiver<bool>) -> ResultSet {
        let channels = self.collect_channels(config).await;
        self.resolve_all(channels, shutdown).await
    }
}

async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    let closed = shutdown.wait_for(|stop| *stop).await.is_err();
    if closed {
        // Sender dropped without signalling; never resolve.
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::TwitchEndpoints;
    use reqwest::Client;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mock_service() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/gql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "streamPlaybackAccessToken": { "value": "tok", "signature": "sig" } }
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/seed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <a href="https://twitch.tv/zed_live">z</a>
                    <iframe src="https://player.twitch.tv/?channel=Mid_Chan"></iframe>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/zed_live"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"isStreaming":true,"viewerCount":3}"#),
            )
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        server
    }

    fn discovery(server: &MockServer) -> Discovery {
        let client = Client::new();
        Discovery::new(
            PageScanner::new(client.clone()),
            StatusResolver::new(client, TwitchEndpoints::with_base(&server.uri())),
        )
        .with_pace(Duration::ZERO)
    }

    fn config(server: &MockServer) -> Config {
        Config {
            target_urls: vec![
                format!("{}/seed", server.uri()),
                "http://127.0.0.1:1/unreachable".to_string(),
            ],
            default_channels: vec![
                "alpha_chan".to_string(),
                "MID_CHAN".to_string(),
                "no".to_string(),
            ],
            proxy: None,
        }
    }

    fn names(set: &ResultSet) -> Vec<&str> {
        set.streams.iter().map(|s| s.channel.as_str()).collect()
    }

    #[tokio::test]
    async fn test_collect_channels_unions_and_dedups() {
        let server = mock_service().await;
        let channels = discovery(&server).collect_channels(&config(&server)).await;

        let names: Vec<String> = channels.into_iter().map(String::from).collect();
        assert_eq!(names, ["alpha_chan", "mid_chan", "zed_live"]);
    }

    #[tokio::test]
    async fn test_run_resolves_in_lexicographic_order() {
        let server = mock_service().await;
        let (_tx, rx) = watch::channel(false);

        let result = discovery(&server).run(&config(&server), rx).await;

        assert_eq!(names(&result), ["alpha_chan", "mid_chan", "zed_live"]);
        assert_eq!(result.live_count(), 1);

        let zed = &result.streams[2];
        assert!(zed.is_live);
        assert_eq!(zed.viewers, "3");
        assert!(result.streams.iter().all(|s| s.has_playback_url()));
    }

    #[tokio::test]
    async fn test_order_is_stable_with_concurrency() {
        let server = mock_service().await;
        let (_tx, rx) = watch::channel(false);

        let first = discovery(&server).run(&config(&server), rx.clone()).await;
        let second = discovery(&server)
            .with_concurrency(4)
            .run(&config(&server), rx)
            .await;

        assert_eq!(names(&first), names(&second));
    }

    #[tokio::test]
    async fn test_failed_resolutions_do_not_abort_batch() {
        let discovery = Discovery::new(
            PageScanner::new(Client::new()),
            StatusResolver::new(Client::new(), TwitchEndpoints::with_base("http://127.0.0.1:1")),
        )
        .with_pace(Duration::ZERO);

        let channels: BTreeSet<ChannelId> = ["first_one", "second_one"]
            .iter()
            .filter_map(|s| ChannelId::parse(s))
            .collect();
        let (_tx, rx) = watch::channel(false);

        let result = discovery.resolve_all(channels, rx).await;
        assert_eq!(result.streams.len(), 2);
        assert!(result.streams.iter().all(|s| s.error.is_some()));
    }

    #[tokio::test]
    async fn test_shutdown_returns_partial_results() {
        let server = mock_service().await;
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let result = discovery(&server).run(&config(&server), rx).await;
        assert!(result.streams.is_empty());
    }

    fn default_only(names: &[&str]) -> Config {
        Config {
            target_urls: Vec::new(),
            default_channels: names.iter().map(|s| s.to_string()).collect(),
            proxy: None,
        }
    }

    #[tokio::test]
    async fn test_pace_spaces_resolution_starts() {
        let server = mock_service().await;
        let (_tx, rx) = watch::channel(false);
        let pace = Duration::from_millis(200);

        let started = std::time::Instant::now();
        let result = discovery(&server)
            .with_pace(pace)
            .run(&default_only(&["chan_one", "chan_two", "chan_three"]), rx)
            .await;

        assert_eq!(result.streams.len(), 3);
        // Three starts need at least two full periods between them
        assert!(started.elapsed() >= pace * 2);
    }

    #[tokio::test]
    async fn test_shutdown_mid_run_keeps_ordered_prefix() {
        let server = mock_service().await;
        let (tx, rx) = watch::channel(false);
        let all = ["chan_a", "chan_b", "chan_c", "chan_d", "chan_e"];

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(600)).await;
            let _ = tx.send(true);
        });

        let result = discovery(&server)
            .with_pace(Duration::from_millis(400))
            .run(&default_only(&all), rx)
            .await;

        let resolved = names(&result);
        assert!(!resolved.is_empty());
        assert!(resolved.len() < all.len());
        assert_eq!(resolved, all[..resolved.len()]);
    }
}
