//! One function per message kind the renderer reacts to.
//!
//! Edit commands check the focused-input guard before anything else. All
//! handlers are no-ops without a loaded project.

use crate::message::{
    ConnectedLibrary, CreateNewPlaceholder, ElementRef, HighlightElement, LibraryCheck,
    LibraryResponse, MessageBody, ProjectFile, ShowError, StartApp, UpdatingLibrary,
};
use crate::model::{PatternLibraryState, Project};

use super::RendererContext;

/// `true` when a text input owns focus and the edit command must not run.
fn input_focused(ctx: &RendererContext<'_>, command: &'static str) -> bool {
    let focused = ctx.app.has_focused_input();
    if focused {
        tracing::debug!(command, "Input focused, ignoring edit command");
    }
    focused
}

pub fn start_app(payload: &StartApp, ctx: &mut RendererContext<'_>) {
    tracing::info!(port = payload.port, "Host started app");
    ctx.store.start(payload.port);
}

/// Load a project handed over by `OpenFileResponse` or `CreateNewFileResponse`.
///
/// A project with a connected library asks the host whether it is still on disk.
pub fn use_project_file(
    payload: &ProjectFile,
    ctx: &mut RendererContext<'_>,
) -> Option<MessageBody> {
    let mut project = match Project::from_document(payload.contents.clone()) {
        Ok(project) => project,
        Err(err) => {
            tracing::warn!(project = %payload.contents.id, error = %err, "Rejected project document");
            return None;
        }
    };
    project.set_path(payload.path.clone());
    let check = (project.pattern_library().state != PatternLibraryState::Pristine)
        .then(|| MessageBody::CheckLibraryRequest(project.to_document()));
    ctx.store.set_project(project);
    check
}

pub fn create_new_page(ctx: &mut RendererContext<'_>) {
    ctx.store.add_new_page();
}

/// Import an analyzed library and tell the host the connection is in use.
pub fn library_response(
    payload: &LibraryResponse,
    ctx: &mut RendererContext<'_>,
) -> Option<MessageBody> {
    let report = ctx
        .store
        .import_library(&payload.analysis, &payload.path, payload.install_type)?;
    let project = ctx.store.project()?;

    tracing::info!(
        library = %payload.analysis.library_id(),
        previous = ?payload.previous_library_id,
        retained = report.retained,
        added = report.added,
        orphaned = report.orphaned_elements.len(),
        "Connected pattern library"
    );

    Some(MessageBody::ConnectedPatternLibraryNotification(
        ConnectedLibrary {
            project_id: project.id().to_string(),
            id: payload.analysis.library_id(),
            path: payload.path.clone(),
            library: project.pattern_library().clone(),
        },
    ))
}

pub fn updating_library(payload: &UpdatingLibrary, ctx: &mut RendererContext<'_>) {
    ctx.store
        .set_pending_library_update(Some(payload.library_id.clone()));
}

pub fn check_library_response(checks: &[LibraryCheck], ctx: &mut RendererContext<'_>) {
    for check in checks {
        ctx.store.set_library_state(&check.id, check.connected);
    }
}

pub fn select_element(payload: &ElementRef, ctx: &mut RendererContext<'_>) {
    ctx.store.select_element(&payload.id);
}

pub fn unselect_element(ctx: &mut RendererContext<'_>) {
    ctx.store.unselect_element();
}

pub fn highlight_element(payload: &HighlightElement, ctx: &mut RendererContext<'_>) {
    let id = payload.element.as_ref().map(|element| element.id.as_str());
    ctx.store.highlight_element(id);
}

pub fn undo(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "undo") {
        ctx.store.undo();
    }
}

pub fn redo(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "redo") {
        ctx.store.redo();
    }
}

pub fn cut(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "cut") {
        ctx.store.cut_selected();
    }
}

pub fn cut_element(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "cut") {
        ctx.store.cut_element_by_id(id);
    }
}

pub fn copy(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "copy") {
        ctx.store.copy_selected();
    }
}

pub fn copy_element(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "copy") {
        ctx.store.copy_element_by_id(id);
    }
}

pub fn paste(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "paste") {
        ctx.store.paste_selected();
    }
}

pub fn paste_element_below(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "paste") {
        ctx.store.paste_after_element_by_id(id);
    }
}

pub fn paste_element_inside(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "paste") {
        ctx.store.paste_inside_element_by_id(id);
    }
}

pub fn delete(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "delete") {
        ctx.store.remove_selected();
    }
}

pub fn delete_element(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "delete") {
        ctx.store.remove_element_by_id(id);
    }
}

pub fn duplicate(ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "duplicate") {
        ctx.store.duplicate_selected();
    }
}

pub fn duplicate_element(id: &str, ctx: &mut RendererContext<'_>) {
    if !input_focused(ctx, "duplicate") {
        ctx.store.duplicate_element_by_id(id);
    }
}

pub fn create_placeholder(payload: &CreateNewPlaceholder, ctx: &mut RendererContext<'_>) {
    ctx.store.create_placeholder(
        &payload.target_element_id,
        &payload.target_content_id,
        payload.is_sibling_drop,
        &payload.data,
    );
}

pub fn show_error(payload: &ShowError, ctx: &mut RendererContext<'_>) {
    tracing::warn!(error = %payload.error.message, "{}", payload.message);
    ctx.store.set_last_error(Some(payload.clone()));
}
