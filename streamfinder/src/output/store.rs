use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};

use crate::channel::ResultSet;

pub const RESULTS_FILE: &str = "streams_data.json";

/// Location of the result file inside an output directory.
pub fn results_path(output_dir: &Path) -> PathBuf {
    output_dir.join(RESULTS_FILE)
}

/**
    Write a result set as pretty-printed JSON, creating the directory if needed.
*/
pub fn save(result: &ResultSet, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .map_err(|e| anyhow!("Failed to create output directory {:?}: {}", output_dir, e))?;

    let path = results_path(output_dir);
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| anyhow!("Failed to serialize results: {}", e))?;

    std::fs::write(&path, json).map_err(|e| anyhow!("Failed to write {:?}: {}", path, e))?;

    Ok(path)
}

/**
    Read a result set written by a previous discovery run.
*/
pub fn load(output_dir: &Path) -> Result<ResultSet> {
    let path = results_path(output_dir);

    let content = std::fs::read_to_string(&path).map_err(|e| {
        anyhow!(
            "Failed to read {:?}: {} (run discovery first)",
            path,
            e
        )
    })?;

    serde_json::from_str(&content).map_err(|e| anyhow!("Invalid JSON in {:?}: {}", path, e))
}
