use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

const TABS: &[&str] = &["sports", "news", "flights", "weather", "rentals"];

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/tabflow/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("tabflow").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The startup tab is a known tab
    /// - The request timeout is non-zero
    /// - Every endpoint is an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !TABS.contains(&self.defaults.tab.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Unknown startup tab '{}' (expected one of: {})",
                    self.defaults.tab,
                    TABS.join(", ")
                ),
            });
        }

        if self.network.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "timeout_seconds must be greater than zero".to_string(),
            });
        }

        let endpoints = [
            ("flights", &self.endpoints.flights),
            ("news", &self.endpoints.news),
            ("weather", &self.endpoints.weather),
            ("sports", &self.endpoints.sports),
            ("rentals", &self.endpoints.rentals),
        ];
        for (name, url) in endpoints {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError {
                    message: format!("Endpoint '{}' is not an http(s) URL: '{}'", name, url),
                });
            }
        }

        Ok(())
    }
}
