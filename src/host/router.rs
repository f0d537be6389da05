use std::sync::Arc;

use parking_lot::Mutex;

use crate::message::{Message, MessageBody};
use crate::transport::{SeenMessages, Transport};

use super::connect::connect_pattern_library;
use super::handlers;
use super::HostContext;

/// Dispatches inbound messages to the host handlers.
pub struct HostRouter {
    ctx: Arc<HostContext>,
    seen: Mutex<SeenMessages>,
}

impl HostRouter {
    pub fn new(ctx: HostContext) -> Self {
        let window = ctx.config.transport.dedup_window;
        Self {
            ctx: Arc::new(ctx),
            seen: Mutex::new(SeenMessages::new(window)),
        }
    }

    pub fn context(&self) -> &HostContext {
        &self.ctx
    }

    /// Handle every inbound message of `transport` on its own task, so a
    /// stalled workflow never holds up delivery of the next message.
    pub fn attach(self: &Arc<Self>, transport: &dyn Transport) {
        let router = Arc::clone(self);
        transport.receive(Box::new(move |message| {
            let router = Arc::clone(&router);
            let message = message.clone();
            tokio::spawn(async move {
                router.route(&message).await;
            });
        }));
    }

    /// Run the handler for `message` to completion. Repeated deliveries are skipped.
    pub async fn route(&self, message: &Message) {
        let fresh = self.seen.lock().insert(message);
        if !fresh {
            tracing::debug!(id = %message.id, kind = ?message.message_type(), "Skipping duplicate message");
            return;
        }

        let ctx = self.ctx.as_ref();
        tracing::trace!(id = %message.id, kind = ?message.message_type(), "Routing host message");
        match &message.body {
            MessageBody::AppLoaded => handlers::app_loaded(message, ctx).await,
            MessageBody::CreateNewFileRequest => handlers::create_new_file(message, ctx).await,
            MessageBody::OpenFileRequest => handlers::open_file(message, ctx).await,
            MessageBody::UseFileRequest(payload) => handlers::use_file(message, payload, ctx).await,
            MessageBody::SaveFileRequest(payload) => {
                handlers::save_file(message, payload, ctx).await
            }
            MessageBody::CheckLibraryRequest(document) => {
                handlers::check_library(message, document, ctx).await
            }
            MessageBody::ConnectPatternLibraryRequest(request) => {
                connect_pattern_library(message, request, ctx).await
            }
            MessageBody::ConnectedPatternLibraryNotification(payload) => {
                handlers::connected_library(payload, ctx).await
            }
            MessageBody::OpenExternalUrl(url) => handlers::open_external_url(url, ctx).await,
            MessageBody::DroppedFile(payload) => {
                handlers::dropped_file(message, payload, ctx).await
            }
            MessageBody::StartApp(_)
            | MessageBody::CreateNewFileResponse(_)
            | MessageBody::OpenFileResponse(_)
            | MessageBody::SaveFileResponse(_)
            | MessageBody::CheckLibraryResponse(_)
            | MessageBody::ConnectPatternLibraryResponse(_)
            | MessageBody::UpdatePatternLibraryResponse(_)
            | MessageBody::UpdatingPatternLibrary(_)
            | MessageBody::ShowError(_)
            | MessageBody::CreateNewPage
            | MessageBody::SelectElement(_)
            | MessageBody::UnselectElement
            | MessageBody::HighlightElement(_)
            | MessageBody::Undo
            | MessageBody::Redo
            | MessageBody::Cut
            | MessageBody::CutElement(_)
            | MessageBody::Copy
            | MessageBody::CopyElement(_)
            | MessageBody::Paste
            | MessageBody::PasteElementBelow(_)
            | MessageBody::PasteElementInside(_)
            | MessageBody::Delete
            | MessageBody::DeleteElement(_)
            | MessageBody::Duplicate
            | MessageBody::DuplicateElement(_)
            | MessageBody::CreateNewPlaceholder(_)
            | MessageBody::PatternLibraryChange(_)
            | MessageBody::PageChange(_)
            | MessageBody::ElementChange(_) => {
                tracing::trace!(kind = ?message.message_type(), "Not a host message");
            }
        }
    }
}
