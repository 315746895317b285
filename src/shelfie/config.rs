//! # Configuration
//!
//! Shelfie configuration is managed by [`confique`], layered from environment
//! variables, a TOML file and compiled defaults.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `SHELFIE_BASE_URL`, `SHELFIE_TIMEOUT_SECS`, etc.
//! 2. **Config file**: `shelfie.toml` in the OS config directory (via `directories`).
//! 3. **Compiled defaults**: `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `base_url` | `http://localhost:5000` | Backend origin; paths start with `/api` |
//! | `timeout_secs` | `30` | Fixed timeout applied to every request |
//! | `stale_secs` | `300` | How long a cached query answer counts as fresh |
//! | `retries` | `1` | Extra attempts for reads that failed on network/5xx |

use crate::error::{Result, ShelfieError};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "shelfie.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ShelfieConfig {
    /// Backend origin, without the `/api` prefix.
    #[config(env = "SHELFIE_BASE_URL", default = "http://localhost:5000")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[config(env = "SHELFIE_TIMEOUT_SECS", default = 30)]
    pub timeout_secs: u64,

    /// Seconds a cached answer is served without refetching.
    #[config(env = "SHELFIE_STALE_SECS", default = 300)]
    pub stale_secs: u64,

    /// Extra attempts for reads that failed with a network or server error.
    #[config(env = "SHELFIE_RETRIES", default = 1)]
    pub retries: u32,
}

impl Default for ShelfieConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            stale_secs: 300,
            retries: 1,
        }
    }
}

impl ShelfieConfig {
    /// Load from the environment and `<config_dir>/shelfie.toml` (if present).
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        let mut builder = ShelfieConfig::builder().env();
        if let Some(dir) = config_dir {
            builder = builder.file(dir.join(CONFIG_FILENAME));
        }
        builder
            .load()
            .map_err(|e| ShelfieError::Config(e.to_string()))
    }

    /// A commented sample `shelfie.toml`.
    pub fn template() -> String {
        confique::toml::template::<ShelfieConfig>(confique::toml::FormatOptions::default())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_secs)
    }

    /// Value of a single key, as shown by `shelfie config get`.
    pub fn get(&self, key: &str) -> Option<String> {
        match normalize_key(key).as_str() {
            "base_url" => Some(self.base_url.clone()),
            "timeout_secs" => Some(self.timeout_secs.to_string()),
            "stale_secs" => Some(self.stale_secs.to_string()),
            "retries" => Some(self.retries.to_string()),
            _ => None,
        }
    }

    pub fn keys() -> &'static [&'static str] {
        &["base_url", "timeout_secs", "stale_secs", "retries"]
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

/// Where the client keeps its files.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Session and query cache.
    pub data_dir: PathBuf,
    /// `shelfie.toml`.
    pub config_dir: PathBuf,
}

impl AppPaths {
    /// OS directories, overridable with `SHELFIE_DATA_DIR` / `SHELFIE_CONFIG_DIR`.
    pub fn resolve() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "shelfie", "shelfie");

        let data_dir = match std::env::var_os("SHELFIE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs
                .as_ref()
                .map(|d| d.data_dir().to_path_buf())
                .ok_or_else(|| ShelfieError::Config("cannot determine data directory".into()))?,
        };
        let config_dir = match std::env::var_os("SHELFIE_CONFIG_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs
                .as_ref()
                .map(|d| d.config_dir().to_path_buf())
                .ok_or_else(|| ShelfieError::Config("cannot determine config directory".into()))?,
        };

        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    pub fn cache_file(&self) -> PathBuf {
        self.data_dir.join("cache.json")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILENAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ShelfieConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.stale_after(), Duration::from_secs(300));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILENAME),
            "base_url = \"https://books.example.com\"\nstale_secs = 10\n",
        )
        .unwrap();

        let config = ShelfieConfig::load(Some(dir.path())).unwrap();
        assert_eq!(config.stale_secs, 10);
        assert_eq!(config.timeout_secs, 30);
        // The environment can still override base_url in CI, so only check
        // it when nothing is set.
        if std::env::var_os("SHELFIE_BASE_URL").is_none() {
            assert_eq!(config.base_url, "https://books.example.com");
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShelfieConfig::load(Some(dir.path())).unwrap();
        if std::env::var_os("SHELFIE_RETRIES").is_none() {
            assert_eq!(config.retries, 1);
        }
    }

    #[test]
    fn test_get_by_key_accepts_dashes() {
        let config = ShelfieConfig::default();
        assert_eq!(config.get("timeout-secs").as_deref(), Some("30"));
        assert_eq!(config.get("nope"), None);
        for key in ShelfieConfig::keys() {
            assert!(config.get(key).is_some());
        }
    }

    #[test]
    fn test_template_mentions_every_key() {
        let template = ShelfieConfig::template();
        for key in ShelfieConfig::keys() {
            assert!(template.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let config = ShelfieConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(1));
    }
}
