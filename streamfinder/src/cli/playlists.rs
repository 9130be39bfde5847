use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::output::{store, write_playlists};

#[derive(Parser, Debug)]
pub struct PlaylistsCommand {
    /// Directory holding streams_data.json; playlists are written here too
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,
}

impl PlaylistsCommand {
    pub async fn run(self) -> Result<()> {
        let result = store::load(&self.output_dir)?;
        let paths = write_playlists(&result, &self.output_dir, crate::util::time::now())?;

        println!(
            "Found {} live streams out of {} total",
            result.live_count(),
            result.streams.len()
        );
        println!("  Full playlist:     {}", paths.full.display());
        println!("  Simple playlist:   {}", paths.simple.display());
        println!("  Combined playlist: {}", paths.combined.display());

        Ok(())
    }
}
