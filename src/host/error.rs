use std::path::PathBuf;

use thiserror::Error;

use crate::model::ModelError;

/// Errors raised by host-side side effects.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid package manifest '{}': {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Corrupt data file '{}': {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported file type '{}'", .path.display())]
    UnsupportedFile { path: PathBuf },

    #[error("Failed to open '{url}': {reason}")]
    OpenUrl { url: String, reason: String },

    #[error("Invalid project: {0}")]
    Project(#[from] ModelError),
}
