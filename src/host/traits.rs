//! Collaborators the host handlers depend on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::message::LibraryConnection;
use crate::model::{LibraryAnalysisResult, PatternLibrary, Project};

use super::app::App;
use super::error::HostError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Open,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
        }
    }
}

/// What the native file dialog should ask for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDialogOptions {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub filters: Vec<FileFilter>,
}

/// OS integration of the host process.
///
/// File access has tokio-backed defaults; dialogs, URLs and app lookup are
/// supplied by the embedding application.
#[async_trait]
pub trait Host: Send + Sync {
    /// The app window registered under `id`.
    fn get_app(&self, id: &str) -> Option<App>;

    /// Show the native file dialog. `None` when the user cancels.
    async fn select_file(&self, options: FileDialogOptions) -> Option<PathBuf>;

    async fn open_external_url(&self, url: &str) -> Result<(), HostError>;

    /// Record a host-level event. Default: an info-level trace.
    fn log(&self, message: &str) {
        tracing::info!(target: "alva_sync::host", "{}", message);
    }

    async fn read_file(&self, path: &Path) -> Result<String, HostError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|source| HostError::Read {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn read_bytes(&self, path: &Path) -> Result<Vec<u8>, HostError> {
        tokio::fs::read(path).await.map_err(|source| HostError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), HostError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|source| HostError::Write {
                path: path.to_path_buf(),
                source,
            })
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

/// Projects known to the host and the libraries connected to them.
#[async_trait]
pub trait DataHost: Send + Sync {
    async fn get_project(&self, id: &str) -> Option<Project>;

    /// Register `project`, replacing a previous version with the same id.
    async fn add_project(&self, project: Project);

    /// Record a library connection, replacing one with the same id.
    async fn add_connection(
        &self,
        project: &Project,
        connection: LibraryConnection,
    ) -> Result<(), HostError>;

    async fn connections(&self, project: &Project) -> Vec<LibraryConnection>;
}

/// Static analysis of a pattern library package.
#[async_trait]
pub trait LibraryAnalyzer: Send + Sync {
    /// Analyze the package rooted at `directory`.
    ///
    /// `previous` is the library this analysis may replace.
    async fn analyze(
        &self,
        directory: &Path,
        previous: Option<&PatternLibrary>,
    ) -> LibraryAnalysisResult;
}
