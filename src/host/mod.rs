//! Host side: collaborator traits, request handlers and their router.
//!
//! Handlers receive a [`HostContext`] with the OS integration, the project
//! data store, the library analyzer and the configuration. Replies go to the
//! [`App`] named by the request's app id.

mod app;
mod connect;
mod data;
mod error;
pub mod handlers;
mod router;
mod traits;

use std::sync::Arc;

use crate::config::Config;
use crate::message::Message;

pub use app::{App, AppRegistry};
pub use connect::{connect_pattern_library, read_manifest, PackageManifest};
pub use data::{FileDataHost, MemoryDataHost};
pub use error::HostError;
pub use router::HostRouter;
pub use traits::{DataHost, DialogKind, FileDialogOptions, FileFilter, Host, LibraryAnalyzer};

/// Everything a host handler may touch.
pub struct HostContext {
    pub host: Arc<dyn Host>,
    pub data_host: Arc<dyn DataHost>,
    pub analyzer: Arc<dyn LibraryAnalyzer>,
    pub config: Config,
}

/// The app a request came from; logs and returns `None` when it is unknown.
pub(crate) fn resolve_app(message: &Message, ctx: &HostContext) -> Option<App> {
    let Some(app_id) = message.app_id.as_deref() else {
        tracing::warn!(kind = ?message.message_type(), "Request carries no app id, dropping");
        return None;
    };
    let app = ctx.host.get_app(app_id);
    if app.is_none() {
        ctx.host.log(&format!("App {} not found", app_id));
        tracing::warn!(app = %app_id, kind = ?message.message_type(), "App not found, dropping request");
    }
    app
}
