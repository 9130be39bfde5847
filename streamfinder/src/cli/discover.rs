use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use tokio::{signal, sync::watch};

use crate::channel::{Discovery, StatusResolver, TwitchEndpoints};
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::output::store;
use crate::scan::PageScanner;

#[derive(Parser, Debug)]
pub struct DiscoverCommand {
    /// Config file with target_urls and default_channels (JSON or YAML)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Directory for streams_data.json
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Minimum seconds between channel resolutions
    #[arg(long, default_value = "1.0")]
    pub pace: f64,

    /// Maximum channel resolutions in flight
    #[arg(long, default_value = "1")]
    pub concurrency: usize,

    /// Stop starting new resolutions after this many seconds
    #[arg(long)]
    pub deadline: Option<u64>,
}

impl Default for DiscoverCommand {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            output_dir: PathBuf::from("output"),
            pace: 1.0,
            concurrency: 1,
            deadline: None,
        }
    }
}

impl DiscoverCommand {
    pub async fn run(self) -> Result<()> {
        let pace = Duration::try_from_secs_f64(self.pace)
            .map_err(|_| anyhow!("--pace must be a non-negative number of seconds"))?;

        let config = Config::load(&self.config)?;
        tracing::info!(
            targets = config.target_urls.len(),
            defaults = config.default_channels.len(),
            "config loaded"
        );

        let client = crate::http::build_client(config.proxy.as_deref())?;
        let discovery = Discovery::new(
            PageScanner::new(client.clone()),
            StatusResolver::new(client, TwitchEndpoints::default()),
        )
        .with_pace(pace)
        .with_concurrency(self.concurrency);

        // Shutdown on Ctrl+C or deadline; partial results are still saved
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        {
            let shutdown_tx = shutdown_tx.clone();
            tokio::spawn(async move {
                if signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupted, finishing in-flight channels");
                    let _ = shutdown_tx.send(true);
                }
            });
        }
        if let Some(secs) = self.deadline {
            let shutdown_tx = shutdown_tx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(secs)).await;
                tracing::warn!(secs, "deadline reached, finishing in-flight channels");
                let _ = shutdown_tx.send(true);
            });
        }

        let result = discovery.run(&config, shutdown_rx).await;
        let path = store::save(&result, &self.output_dir)?;

        println!();
        println!("Summary:");
        println!("  Total channels: {}", result.streams.len());
        println!("  Live streams:   {}", result.live_count());
        println!("  Results saved to: {}", path.display());

        if result.live_count() > 0 {
            println!();
            println!("Live now:");
            for stream in result.live() {
                println!(
                    "  {} - {} viewers - {}",
                    stream.channel, stream.viewers, stream.game
                );
            }
        }

        Ok(())
    }
}
