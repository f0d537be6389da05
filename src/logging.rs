//! Tracing setup for the host and renderer processes.
//!
//! Output goes to a file only; both processes usually share a terminal with
//! the UI. Each process writes its own file so renderer and host logs never
//! interleave.

use std::path::{Path, PathBuf};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Env var naming the log file. Takes precedence over `logging.file`.
pub const LOG_ENV: &str = "ALVA_SYNC_LOG";

/// Which side of the transport is logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRole {
    Host,
    Renderer,
}

impl ProcessRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::Renderer => "renderer",
        }
    }
}

/// `{base}.{role}.{timestamp}.{pid}`
pub fn log_file_path(base: &Path, role: ProcessRole, timestamp: u64, pid: u32) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!(".{}.{}.{}", role.as_str(), timestamp, pid));
    PathBuf::from(name)
}

/// Filter from `RUST_LOG`, else from `logging.filter`, else `info`.
fn filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber for `role`; returns the file written to.
///
/// Does nothing when neither `ALVA_SYNC_LOG` nor `logging.file` names a file.
pub fn init_tracing(config: &LoggingConfig, role: ProcessRole) -> Option<PathBuf> {
    let base = std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .or_else(|| config.file.clone())?;

    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = log_file_path(&base, role, timestamp, std::process::id());

    let file = match std::fs::File::create(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: Failed to create log file {}: {}", path.display(), err);
            return None;
        }
    };

    let file_layer = fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    if tracing_subscriber::registry()
        .with(filter(config))
        .with(file_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: A tracing subscriber is already installed");
        return None;
    }

    tracing::info!(role = role.as_str(), path = %path.display(), "Logging initialized");
    Some(path)
}
