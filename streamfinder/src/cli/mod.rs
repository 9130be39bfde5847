use anyhow::Result;
use clap::{Parser, Subcommand};

mod check;
mod discover;
mod playlists;

pub use check::CheckCommand;
pub use discover::DiscoverCommand;
pub use playlists::PlaylistsCommand;

#[derive(Parser, Debug)]
#[command(name = "streamfinder")]
#[command(about = "Find Twitch channels referenced on web pages and build HLS playlists")]
pub struct Args {
    /// Log level for diagnostics (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan seed pages, resolve every channel and save the results (default)
    Discover(DiscoverCommand),
    /// Build M3U playlists from saved results
    Playlists(PlaylistsCommand),
    /// Resolve a single channel and print its status
    Check(CheckCommand),
}

impl Args {
    pub async fn run(self) -> Result<()> {
        crate::logging::init_logging(&self.log_level)?;

        let command = self
            .command
            .unwrap_or(Command::Discover(DiscoverCommand::default()));

        match command {
            Command::Discover(cmd) => cmd.run().await,
            Command::Playlists(cmd) => cmd.run().await,
            Command::Check(cmd) => cmd.run().await,
        }
    }
}
