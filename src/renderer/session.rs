use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::Config;
use crate::message::{Message, MessageBody};
use crate::store::ViewStore;
use crate::transport::Transport;

use super::broadcast::derived_messages;
use super::router::RendererRouter;
use super::{RendererContext, UiBridge};

/// A renderer window: its store, its router and its link to the host.
///
/// Inbound messages and local edits both mutate the store and then wake the
/// broadcaster, which waits for the debounce period and sends the derived
/// state that changed.
#[derive(Clone)]
pub struct RendererSession {
    shared: Arc<Shared>,
}

struct Shared {
    app_id: String,
    store: Mutex<ViewStore>,
    router: Mutex<RendererRouter>,
    transport: Arc<dyn Transport>,
    ui: Arc<dyn UiBridge>,
    changed: Arc<Notify>,
    debounce: Duration,
}

impl RendererSession {
    pub fn new(transport: Arc<dyn Transport>, ui: Arc<dyn UiBridge>, config: &Config) -> Self {
        Self {
            shared: Arc::new(Shared {
                app_id: Uuid::new_v4().to_string(),
                store: Mutex::new(ViewStore::new(config.history.max_entries)),
                router: Mutex::new(RendererRouter::new(config.transport.dedup_window)),
                transport,
                ui,
                changed: Arc::new(Notify::new()),
                debounce: config.broadcast.debounce(),
            }),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.shared.app_id
    }

    /// Register with the transport and announce the app to the host.
    pub fn attach(&self) {
        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        self.shared.transport.receive(Box::new(move |message| {
            if let Some(shared) = weak.upgrade() {
                shared.handle(message);
            }
        }));
        self.shared.send(Message::new(MessageBody::AppLoaded));
    }

    /// Route one inbound message as if it came from the transport.
    pub fn handle(&self, message: &Message) {
        self.shared.handle(message);
    }

    /// Send a request tagged with this app and a fresh transaction.
    pub fn request(&self, body: MessageBody) -> Message {
        let message = Message::new(body)
            .with_transaction(Uuid::new_v4())
            .with_app(self.shared.app_id.clone());
        self.shared.transport.send(message.clone());
        message
    }

    pub fn with_store<R>(&self, f: impl FnOnce(&ViewStore) -> R) -> R {
        f(&*self.shared.store.lock())
    }

    /// Run a local edit against the store and schedule a broadcast.
    pub fn edit<R>(&self, f: impl FnOnce(&mut ViewStore) -> R) -> R {
        let result = f(&mut *self.shared.store.lock());
        self.shared.changed.notify_one();
        result
    }

    /// Send derived state changed since the last flush; returns the number of messages sent.
    pub fn flush(&self) -> usize {
        self.shared.flush()
    }

    /// Debounced broadcaster. Stops once the session is dropped.
    pub fn spawn_broadcaster(&self) -> JoinHandle<()> {
        let changed = self.shared.changed.clone();
        let debounce = self.shared.debounce;
        let weak = Arc::downgrade(&self.shared);

        tokio::spawn(async move {
            loop {
                changed.notified().await;
                tokio::time::sleep(debounce).await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                shared.flush();
            }
            tracing::debug!("Renderer broadcaster stopped");
        })
    }
}

impl Shared {
    fn handle(&self, message: &Message) {
        let outgoing = {
            let mut router = self.router.lock();
            let mut store = self.store.lock();
            let mut ctx = RendererContext {
                store: &mut *store,
                app: self.ui.as_ref(),
            };
            router.route(message, &mut ctx)
        };

        for reply in outgoing {
            self.send(reply);
        }
        self.changed.notify_one();
    }

    fn flush(&self) -> usize {
        let bodies = {
            let mut store = self.store.lock();
            let changes = store.take_changes();
            if changes.is_empty() {
                return 0;
            }
            derived_messages(&store, changes)
        };

        let count = bodies.len();
        for body in bodies {
            self.send(Message::new(body));
        }
        tracing::trace!(count, "Broadcast derived state");
        count
    }

    fn send(&self, message: Message) {
        self.transport.send(message.with_app(self.app_id.clone()));
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // Wake the broadcaster so it notices the session is gone.
        self.changed.notify_one();
    }
}
