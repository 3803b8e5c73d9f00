//! Configuration management for Huuqo
//!
//! Config is stored at ~/.config/huuqo/config.toml. Every field is optional
//! in the file; missing values fall back to the defaults below.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::tmdb::DEFAULT_BASE_URL;
use crate::api::ClientOptions;
use crate::models::IMAGE_BASE_URL;

/// Environment variable checked before the config file for the API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// TMDB API key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tmdb_api_key: Option<String>,
    /// API root, without a trailing slash
    pub base_url: String,
    /// Image host root
    pub image_base_url: String,
    /// Result language (e.g. en-US)
    pub language: String,
    /// Region used for popular lists and provider availability
    pub region: String,
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Pause before each search page fetch
    pub search_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            image_base_url: IMAGE_BASE_URL.to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
            request_timeout_secs: 30,
            search_delay_ms: 300,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/huuqo/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("huuqo").join("config.toml"))
    }

    /// Load config from the default path, or return defaults if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| Self::load_from(&p).ok())
            .unwrap_or_default()
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Invalid config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Get the TMDB API key with fallback chain:
    /// 1. Environment variable TMDB_API_KEY
    /// 2. Key from the config file
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with(std::env::var(API_KEY_ENV).ok())
    }

    fn api_key_with(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.tmdb_api_key
                    .clone()
                    .filter(|k| !k.trim().is_empty())
            })
            .ok_or_else(|| {
                anyhow!(
                    "No TMDB API key: set {} or tmdb_api_key in the config file",
                    API_KEY_ENV
                )
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }

    /// Client options derived from this config
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.base_url.trim_end_matches('/').to_string(),
            image_base_url: self.image_base_url.trim_end_matches('/').to_string(),
            language: self.language.clone(),
            region: self.region.clone(),
            timeout: self.request_timeout(),
        }
    }
}
