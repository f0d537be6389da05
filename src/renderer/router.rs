use crate::message::{Message, MessageBody};
use crate::transport::SeenMessages;

use super::handlers;
use super::RendererContext;

/// Dispatches inbound messages to the renderer handlers.
pub struct RendererRouter {
    seen: SeenMessages,
}

impl RendererRouter {
    pub fn new(dedup_window: usize) -> Self {
        Self {
            seen: SeenMessages::new(dedup_window),
        }
    }

    /// Run the handler for `message`; returns the messages it wants sent.
    ///
    /// Repeated deliveries are skipped. Kinds addressed to the host are ignored.
    pub fn route(&mut self, message: &Message, ctx: &mut RendererContext<'_>) -> Vec<Message> {
        if !self.seen.insert(message) {
            tracing::debug!(id = %message.id, kind = ?message.message_type(), "Skipping duplicate message");
            return Vec::new();
        }

        let reply = match &message.body {
            MessageBody::StartApp(payload) => {
                handlers::start_app(payload, ctx);
                None
            }
            MessageBody::OpenFileResponse(payload) | MessageBody::CreateNewFileResponse(payload) => {
                handlers::use_project_file(payload, ctx)
            }
            MessageBody::CreateNewPage => {
                handlers::create_new_page(ctx);
                None
            }
            MessageBody::ConnectPatternLibraryResponse(payload)
            | MessageBody::UpdatePatternLibraryResponse(payload) => {
                handlers::library_response(payload, ctx)
            }
            MessageBody::UpdatingPatternLibrary(payload) => {
                handlers::updating_library(payload, ctx);
                None
            }
            MessageBody::CheckLibraryResponse(checks) => {
                handlers::check_library_response(checks, ctx);
                None
            }
            MessageBody::SelectElement(payload) => {
                handlers::select_element(payload, ctx);
                None
            }
            MessageBody::UnselectElement => {
                handlers::unselect_element(ctx);
                None
            }
            MessageBody::HighlightElement(payload) => {
                handlers::highlight_element(payload, ctx);
                None
            }
            MessageBody::Undo => {
                handlers::undo(ctx);
                None
            }
            MessageBody::Redo => {
                handlers::redo(ctx);
                None
            }
            MessageBody::Cut => {
                handlers::cut(ctx);
                None
            }
            MessageBody::CutElement(id) => {
                handlers::cut_element(id, ctx);
                None
            }
            MessageBody::Copy => {
                handlers::copy(ctx);
                None
            }
            MessageBody::CopyElement(id) => {
                handlers::copy_element(id, ctx);
                None
            }
            MessageBody::Paste => {
                handlers::paste(ctx);
                None
            }
            MessageBody::PasteElementBelow(id) => {
                handlers::paste_element_below(id, ctx);
                None
            }
            MessageBody::PasteElementInside(id) => {
                handlers::paste_element_inside(id, ctx);
                None
            }
            MessageBody::Delete => {
                handlers::delete(ctx);
                None
            }
            MessageBody::DeleteElement(id) => {
                handlers::delete_element(id, ctx);
                None
            }
            MessageBody::Duplicate => {
                handlers::duplicate(ctx);
                None
            }
            MessageBody::DuplicateElement(id) => {
                handlers::duplicate_element(id, ctx);
                None
            }
            MessageBody::CreateNewPlaceholder(payload) => {
                handlers::create_placeholder(payload, ctx);
                None
            }
            MessageBody::ShowError(payload) => {
                handlers::show_error(payload, ctx);
                None
            }
            MessageBody::AppLoaded
            | MessageBody::CreateNewFileRequest
            | MessageBody::OpenFileRequest
            | MessageBody::UseFileRequest(_)
            | MessageBody::SaveFileRequest(_)
            | MessageBody::SaveFileResponse(_)
            | MessageBody::OpenExternalUrl(_)
            | MessageBody::CheckLibraryRequest(_)
            | MessageBody::ConnectPatternLibraryRequest(_)
            | MessageBody::ConnectedPatternLibraryNotification(_)
            | MessageBody::DroppedFile(_)
            | MessageBody::PatternLibraryChange(_)
            | MessageBody::PageChange(_)
            | MessageBody::ElementChange(_) => {
                tracing::trace!(kind = ?message.message_type(), "Not a renderer message");
                None
            }
        };

        reply.map(Message::new).into_iter().collect()
    }
}
