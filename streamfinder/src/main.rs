use anyhow::Result;
use clap::Parser;

mod channel;
mod cli;
mod config;
mod error;
mod http;
mod logging;
mod output;
mod scan;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    cli::Args::parse().run().await
}
