use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub broadcast: BroadcastConfig,
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Message transport settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Frames buffered per direction before sends fail (default: 64).
    #[serde(default = "default_buffer")]
    pub buffer: usize,
    /// Number of recent message ids remembered to skip duplicates (default: 256).
    #[serde(default = "default_dedup_window")]
    pub dedup_window: usize,
}

/// Undo/redo settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Undo entries kept before the oldest is dropped (default: 100).
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

/// Derived-state broadcast settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastConfig {
    /// Quiet period before changed state is re-broadcast (default: 50).
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl BroadcastConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Host process settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Preview server port announced in `StartApp` (default: 1879).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Answer requests for unknown projects with `ShowError` instead of dropping them.
    #[serde(default)]
    pub report_resolution_failures: bool,
    /// Directory for persisted host data; platform data dir when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Texts shown when a pattern library cannot be connected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default = "default_incompatible_message")]
    pub incompatible_message: String,
    #[serde(default = "default_incompatible_detail")]
    pub incompatible_detail: String,
    #[serde(default = "default_help_url")]
    pub help_url: String,
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base path of the log file; logging is off when unset and `ALVA_SYNC_LOG` is empty.
    #[serde(default)]
    pub file: Option<PathBuf>,
    /// `EnvFilter` directives used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_buffer() -> usize {
    64
}

fn default_dedup_window() -> usize {
    256
}

fn default_max_entries() -> usize {
    100
}

fn default_debounce_ms() -> u64 {
    50
}

fn default_port() -> u16 {
    1879
}

fn default_filter() -> String {
    "info".to_string()
}

fn default_incompatible_message() -> String {
    "Sorry, this seems to be an incompatible library.".to_string()
}

fn default_incompatible_detail() -> String {
    "Learn more about supported component libraries on github.com/meetalva".to_string()
}

fn default_help_url() -> String {
    "https://github.com/meetalva/alva#pattern-library-requirements".to_string()
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            buffer: default_buffer(),
            dedup_window: default_dedup_window(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            report_resolution_failures: false,
            data_dir: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            filter: default_filter(),
        }
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            incompatible_message: default_incompatible_message(),
            incompatible_detail: default_incompatible_detail(),
            help_url: default_help_url(),
        }
    }
}
