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

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/alva-sync/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("alva-sync").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from `path`.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    /// - Returns an error if reading, parsing, or validation fails.
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
    /// - Transport buffer and dedup window are non-zero
    /// - History keeps at least one entry
    /// - The library help link is an http(s) URL
    /// - The log filter parses
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.buffer == 0 {
            return Err(ConfigError::ValidationError {
                message: "transport.buffer must be greater than 0".to_string(),
            });
        }

        if self.transport.dedup_window == 0 {
            return Err(ConfigError::ValidationError {
                message: "transport.dedup_window must be greater than 0".to_string(),
            });
        }

        if self.history.max_entries == 0 {
            return Err(ConfigError::ValidationError {
                message: "history.max_entries must be greater than 0".to_string(),
            });
        }

        let help = &self.library.help_url;
        if !(help.starts_with("https://") || help.starts_with("http://")) {
            return Err(ConfigError::ValidationError {
                message: format!("library.help_url '{}' is not an http(s) URL", help),
            });
        }

        if let Err(err) = tracing_subscriber::EnvFilter::try_new(&self.logging.filter) {
            return Err(ConfigError::ValidationError {
                message: format!("logging.filter '{}' is invalid: {}", self.logging.filter, err),
            });
        }

        Ok(())
    }
}
