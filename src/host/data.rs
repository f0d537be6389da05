//! [`DataHost`] implementations.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::config::HostConfig;
use crate::message::LibraryConnection;
use crate::model::Project;

use super::error::HostError;
use super::traits::DataHost;

type Connections = BTreeMap<String, Vec<LibraryConnection>>;

fn upsert(connections: &mut Connections, project_id: &str, connection: LibraryConnection) {
    let list = connections.entry(project_id.to_string()).or_default();
    match list.iter_mut().find(|existing| existing.id == connection.id) {
        Some(existing) => *existing = connection,
        None => list.push(connection),
    }
}

/// Keeps projects and connections in memory only.
#[derive(Default)]
pub struct MemoryDataHost {
    projects: RwLock<HashMap<String, Project>>,
    connections: Mutex<Connections>,
}

impl MemoryDataHost {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataHost for MemoryDataHost {
    async fn get_project(&self, id: &str) -> Option<Project> {
        self.projects.read().get(id).cloned()
    }

    async fn add_project(&self, project: Project) {
        self.projects
            .write()
            .insert(project.id().to_string(), project);
    }

    async fn add_connection(
        &self,
        project: &Project,
        connection: LibraryConnection,
    ) -> Result<(), HostError> {
        upsert(&mut self.connections.lock(), project.id(), connection);
        Ok(())
    }

    async fn connections(&self, project: &Project) -> Vec<LibraryConnection> {
        self.connections
            .lock()
            .get(project.id())
            .cloned()
            .unwrap_or_default()
    }
}

/// Keeps projects in memory and persists library connections to
/// `connections.json` in its data directory.
pub struct FileDataHost {
    path: PathBuf,
    projects: RwLock<HashMap<String, Project>>,
    connections: Mutex<Connections>,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileDataHost {
    pub const FILE_NAME: &'static str = "connections.json";

    /// Platform data directory, e.g. `~/.local/share/alva-sync` on Linux.
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("alva-sync")
    }

    /// Open the directory named by `host.data_dir`, or [`Self::default_dir`].
    pub async fn from_config(config: &HostConfig) -> Result<Self, HostError> {
        let dir = config.data_dir.clone().unwrap_or_else(Self::default_dir);
        Self::open(dir).await
    }

    /// Load persisted connections from `dir`; a missing file means none.
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = dir.as_ref().join(Self::FILE_NAME);
        let connections = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text).map_err(|source| HostError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Connections::new(),
            Err(source) => return Err(HostError::Read { path, source }),
        };

        tracing::debug!(path = %path.display(), projects = connections.len(), "Loaded library connections");
        Ok(Self {
            path,
            projects: RwLock::new(HashMap::new()),
            connections: Mutex::new(connections),
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), HostError> {
        let _guard = self.write_lock.lock().await;
        let text = {
            let connections = self.connections.lock();
            serde_json::to_string_pretty(&*connections).map_err(|source| HostError::Encode {
                what: "library connections",
                source,
            })?
        };

        let write_error = |source| HostError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
        }
        let temp = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp, text).await.map_err(write_error)?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .map_err(write_error)?;
        Ok(())
    }
}

#[async_trait]
impl DataHost for FileDataHost {
    async fn get_project(&self, id: &str) -> Option<Project> {
        self.projects.read().get(id).cloned()
    }

    async fn add_project(&self, project: Project) {
        self.projects
            .write()
            .insert(project.id().to_string(), project);
    }

    async fn add_connection(
        &self,
        project: &Project,
        connection: LibraryConnection,
    ) -> Result<(), HostError> {
        tracing::debug!(project = %project.id(), library = %connection.id, "Persisting library connection");
        upsert(&mut self.connections.lock(), project.id(), connection);
        self.persist().await
    }

    async fn connections(&self, project: &Project) -> Vec<LibraryConnection> {
        self.connections
            .lock()
            .get(project.id())
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connection(id: &str, path: &str) -> LibraryConnection {
        LibraryConnection {
            id: id.to_string(),
            path: PathBuf::from(path),
        }
    }

    #[tokio::test]
    async fn memory_host_replaces_connection_with_same_id() {
        let host = MemoryDataHost::new();
        let project = Project::create("Demo");
        host.add_connection(&project, connection("foo@1.0.0", "/a"))
            .await
            .expect("add");
        host.add_connection(&project, connection("foo@1.0.0", "/b"))
            .await
            .expect("add");

        let connections = host.connections(&project).await;
        assert_eq!(connections, vec![connection("foo@1.0.0", "/b")]);
    }

    #[tokio::test]
    async fn memory_host_returns_added_project() {
        let host = MemoryDataHost::new();
        let project = Project::create("Demo");
        host.add_project(project.clone()).await;
        assert_eq!(host.get_project(project.id()).await, Some(project));
        assert!(host.get_project("missing").await.is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join(FileDataHost::FILE_NAME), "not json").expect("write");
        assert!(matches!(
            FileDataHost::open(dir.path()).await,
            Err(HostError::Corrupt { .. })
        ));
    }
}
