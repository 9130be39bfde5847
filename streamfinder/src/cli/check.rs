use anyhow::{Context, Result};
use clap::Parser;

use crate::channel::{ChannelId, StatusResolver, TwitchEndpoints};

#[derive(Parser, Debug)]
pub struct CheckCommand {
    /// Channel login to resolve
    pub channel: String,

    /// Optional HTTP or SOCKS5 proxy URL
    #[arg(long)]
    pub proxy: Option<String>,
}

impl CheckCommand {
    pub async fn run(self) -> Result<()> {
        let channel = ChannelId::parse(&self.channel).with_context(|| {
            format!(
                "'{}' is not a valid channel (4-25 letters, digits or underscores)",
                self.channel
            )
        })?;

        let client = crate::http::build_client(self.proxy.as_deref())?;
        let resolver = StatusResolver::new(client, TwitchEndpoints::default());
        let status = resolver.resolve(&channel).await;

        println!("{}", serde_json::to_string_pretty(&status)?);
        Ok(())
    }
}
