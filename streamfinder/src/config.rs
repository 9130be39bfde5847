use std::path::Path;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/twitch_ids.json";

/// Discovery inputs: pages to scan and channels always checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Seed pages scanned for channel references
    #[serde(default)]
    pub target_urls: Vec<String>,
    /// Channels checked regardless of what the seed pages reference
    #[serde(default)]
    pub default_channels: Vec<String>,
    /// Optional HTTP or SOCKS5 proxy URL (e.g., "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy: Option<String>,
}

impl Config {
    /**
        Load a config file. YAML is used for `.yaml`/`.yml`, JSON otherwise.
    */
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config {:?}: {}", path, e))?;

        let is_yaml = path
            .extension()
            .map(|e| e == "yaml" || e == "yml")
            .unwrap_or(false);

        if is_yaml {
            serde_yaml::from_str(&content).map_err(|e| anyhow!("Failed to parse {:?}: {}", path, e))
        } else {
            serde_json::from_str(&content).map_err(|e| anyhow!("Failed to parse {:?}: {}", path, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("twitch_ids.json");
        std::fs::write(
            &path,
            r#"{ "target_urls": ["https://example.com"], "default_channels": ["alice", "bob_tv"] }"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.target_urls, ["https://example.com"]);
        assert_eq!(config.default_channels, ["alice", "bob_tv"]);
        assert_eq!(config.proxy, None);
    }

    #[test]
    fn test_load_yaml_with_missing_lists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sources.yaml");
        std::fs::write(&path, "default_channels:\n  - alice\nproxy: socks5://127.0.0.1:1080\n")
            .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.target_urls.is_empty());
        assert_eq!(config.default_channels, ["alice"]);
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn test_corrupt_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
