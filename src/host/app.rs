use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::message::Message;
use crate::transport::Transport;

/// A connected renderer window as seen from the host.
#[derive(Clone)]
pub struct App {
    id: String,
    transport: Arc<dyn Transport>,
}

impl App {
    pub fn new(id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            id: id.into(),
            transport,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Send `message` to this app, tagged with its id.
    pub fn send(&self, message: Message) {
        self.transport.send(message.with_app(self.id.clone()));
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").field("id", &self.id).finish()
    }
}

/// Apps by id.
#[derive(Default)]
pub struct AppRegistry {
    apps: RwLock<HashMap<String, App>>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, app: App) {
        tracing::debug!(app = %app.id(), "App registered");
        self.apps.write().insert(app.id.clone(), app);
    }

    pub fn remove(&self, id: &str) -> Option<App> {
        self.apps.write().remove(id)
    }

    pub fn get(&self, id: &str) -> Option<App> {
        self.apps.read().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.apps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.read().is_empty()
    }
}
