//! Host handlers for file, library and OS requests.
//!
//! Each handler resolves the requesting app first and sends nothing when it
//! is unknown. User-cancelled dialogs end the request silently; failures the
//! user can act on are answered with `ShowError`.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::message::{
    ConnectedLibrary, CreateNewPlaceholder, DroppedFile, ErrorDetail, LibraryCheck,
    LibraryConnection, Message, MessageBody, ProjectFile, SaveFileRequest, SavedFile, ShowError,
    StartApp, UseFileRequest,
};
use crate::model::{PatternLibraryState, Project, ProjectDocument};

use super::error::HostError;
use super::traits::{DialogKind, FileDialogOptions, FileFilter};
use super::{resolve_app, HostContext};

pub const NEW_PROJECT_NAME: &str = "New Project";

fn project_dialog(kind: DialogKind) -> FileDialogOptions {
    let (title, message) = match kind {
        DialogKind::Open => ("Open Alva File", "Select an Alva file to open"),
        DialogKind::Save => ("Save Alva File", "Choose where to save the project"),
    };
    FileDialogOptions {
        kind,
        title: title.to_string(),
        message: message.to_string(),
        filters: vec![FileFilter::new("Alva File", &["alva"])],
    }
}

fn file_error(message: &str, err: &HostError) -> MessageBody {
    MessageBody::ShowError(ShowError {
        message: message.to_string(),
        detail: String::new(),
        help: String::new(),
        error: ErrorDetail {
            message: err.to_string(),
            stack: String::new(),
        },
    })
}

/// Mime type of the image formats a drop may carry.
pub fn image_mime(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "svg" => Some("image/svg+xml"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

pub async fn app_loaded(message: &Message, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    tracing::info!(app = %app.id(), port = ctx.config.host.port, "App loaded");
    app.send(Message::reply_to(
        message,
        MessageBody::StartApp(StartApp {
            port: ctx.config.host.port,
        }),
    ));
}

pub async fn create_new_file(message: &Message, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    let project = Project::create(NEW_PROJECT_NAME);
    let contents = project.to_document();
    ctx.data_host.add_project(project).await;
    app.send(Message::respond_to(
        message,
        MessageBody::CreateNewFileResponse(ProjectFile {
            path: None,
            contents,
        }),
    ));
}

async fn load_project(ctx: &HostContext, path: &Path) -> Result<Project, HostError> {
    let text = ctx.host.read_file(path).await?;
    let mut project = Project::from_json(&text)?;
    project.set_path(Some(path.to_path_buf()));
    Ok(project)
}

pub async fn open_file(message: &Message, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    let Some(path) = ctx.host.select_file(project_dialog(DialogKind::Open)).await else {
        ctx.host.log("Open file cancelled");
        return;
    };

    match load_project(ctx, &path).await {
        Ok(project) => {
            let contents = project.to_document();
            ctx.data_host.add_project(project).await;
            app.send(Message::respond_to(
                message,
                MessageBody::OpenFileResponse(ProjectFile {
                    path: Some(path),
                    contents,
                }),
            ));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to open project");
            app.send(Message::reply_to(
                message,
                file_error("Sorry, we could not open this file.", &err),
            ));
        }
    }
}

/// Load a project from document text, as on file drop or restore.
pub async fn use_file(message: &Message, payload: &UseFileRequest, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };

    match Project::from_json(&payload.contents) {
        Ok(project) => {
            let contents = project.to_document();
            ctx.data_host.add_project(project).await;
            app.send(Message::respond_to(
                message,
                MessageBody::OpenFileResponse(ProjectFile {
                    path: None,
                    contents,
                }),
            ));
        }
        Err(err) => {
            let err = HostError::from(err);
            tracing::warn!(silent = payload.silent, error = %err, "Rejected project contents");
            if !payload.silent {
                app.send(Message::reply_to(
                    message,
                    file_error("Sorry, this file could not be used.", &err),
                ));
            }
        }
    }
}

async fn save_project(
    ctx: &HostContext,
    document: &ProjectDocument,
    path: &Path,
) -> Result<Project, HostError> {
    let mut project = Project::from_document(document.clone())?;
    let text = project.to_json()?;
    ctx.host.write_file(path, &text).await?;
    project.set_path(Some(path.to_path_buf()));
    Ok(project)
}

pub async fn save_file(message: &Message, payload: &SaveFileRequest, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    let path: PathBuf = match &payload.path {
        Some(path) => path.clone(),
        None => match ctx.host.select_file(project_dialog(DialogKind::Save)).await {
            Some(path) => path,
            None => {
                ctx.host.log("Save file cancelled");
                return;
            }
        },
    };

    match save_project(ctx, &payload.contents, &path).await {
        Ok(project) => {
            tracing::info!(project = %project.id(), path = %path.display(), "Project saved");
            ctx.data_host.add_project(project).await;
            app.send(Message::respond_to(
                message,
                MessageBody::SaveFileResponse(SavedFile { path }),
            ));
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to save project");
            app.send(Message::reply_to(
                message,
                file_error("Sorry, we could not save this file.", &err),
            ));
        }
    }
}

/// Report whether the project's connected library is still on disk.
pub async fn check_library(message: &Message, document: &ProjectDocument, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    let project = match Project::from_document(document.clone()) {
        Ok(project) => project,
        Err(err) => {
            tracing::warn!(project = %document.id, error = %err, "Cannot check libraries of invalid project");
            return;
        }
    };

    let library = project.pattern_library();
    let mut checks = Vec::new();
    if library.state != PatternLibraryState::Pristine {
        let connections = ctx.data_host.connections(&project).await;
        let connected = match connections.iter().find(|c| c.id == library.id) {
            Some(connection) => ctx.host.exists(&connection.path).await,
            None => false,
        };
        tracing::debug!(library = %library.id, connected, "Checked library connection");
        checks.push(LibraryCheck {
            id: library.id.clone(),
            connected,
        });
    }

    ctx.data_host.add_project(project).await;
    app.send(Message::respond_to(
        message,
        MessageBody::CheckLibraryResponse(checks),
    ));
}

/// Adopt the library the renderer imported and record where it lives.
pub async fn connected_library(payload: &ConnectedLibrary, ctx: &HostContext) {
    let Some(mut project) = ctx.data_host.get_project(&payload.project_id).await else {
        tracing::warn!(project = %payload.project_id, "Project not found, ignoring connected library");
        return;
    };
    *project.pattern_library_mut() = payload.library.clone();
    ctx.data_host.add_project(project.clone()).await;

    let connection = LibraryConnection {
        id: payload.id.clone(),
        path: payload.path.clone(),
    };
    if let Err(err) = ctx.data_host.add_connection(&project, connection).await {
        tracing::warn!(library = %payload.id, error = %err, "Failed to persist library connection");
    }
}

pub async fn open_external_url(url: &str, ctx: &HostContext) {
    if let Err(err) = ctx.host.open_external_url(url).await {
        tracing::warn!(url, error = %err, "Failed to open external URL");
    }
}

/// Answer an image drop with a placeholder carrying the image as a data URI.
pub async fn dropped_file(message: &Message, payload: &DroppedFile, ctx: &HostContext) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };
    let Some(mime) = image_mime(&payload.path) else {
        let err = HostError::UnsupportedFile {
            path: payload.path.clone(),
        };
        tracing::debug!(error = %err, "Ignoring dropped file");
        return;
    };

    let bytes = match ctx.host.read_bytes(&payload.path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read dropped file");
            return;
        }
    };

    app.send(Message::reply_to(
        message,
        MessageBody::CreateNewPlaceholder(CreateNewPlaceholder {
            target_element_id: payload.target_element_id.clone(),
            target_content_id: payload.target_content_id.clone(),
            is_sibling_drop: payload.is_sibling_drop,
            data: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        }),
    ));
}
