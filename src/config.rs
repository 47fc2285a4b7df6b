//! Configuration management for TubeTUI
//!
//! Handles config file loading/saving and API key resolution.
//! Config is stored at ~/.config/tubetui/config.toml

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable consulted before the config file
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// Configuration errors, surfaced distinctly from network failures
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "no YouTube API key configured. Set the {API_KEY_ENV} environment variable \
         or add `youtube_api_key` to the config file."
    )]
    MissingApiKey,
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API v3 key
    pub youtube_api_key: Option<String>,
    /// Query searched automatically when the TUI starts
    pub default_query: Option<String>,
    /// Preferred playback target ("mpv" or "browser")
    pub preferred_player: Option<String>,
}

impl Config {
    /// Get config file path (~/.config/tubetui/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tubetui").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path()
            .and_then(|p| std::fs::read_to_string(p).ok())
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path =
            Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Resolve the API key: environment variable first, then config file.
    ///
    /// Read once at startup; a missing key is a configuration error, not
    /// a network failure, and every lookup attempt is fatal without it.
    pub fn require_api_key(&self) -> Result<String, ConfigError> {
        resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            self.youtube_api_key.as_deref(),
        )
    }
}

/// Precedence rule behind [`Config::require_api_key`], split out so the
/// fallback chain is testable without touching process environment
fn resolve_api_key(
    env_key: Option<String>,
    config_key: Option<&str>,
) -> Result<String, ConfigError> {
    if let Some(key) = env_key.filter(|k| !k.is_empty()) {
        return Ok(key);
    }
    match config_key {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        _ => Err(ConfigError::MissingApiKey),
    }
}
