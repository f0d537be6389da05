//! Connecting a pattern library to a project.
//!
//! The workflow resolves the requesting app and project, asks the user for
//! the library's `package.json`, analyzes the package and answers with a
//! connect or update response. Every step short-circuits: resolution
//! failures and a cancelled dialog end the request silently, unusable
//! libraries end it with one `ShowError`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::message::{
    ConnectLibraryRequest, ErrorDetail, LibraryConnection, LibraryResponse, Message, MessageBody,
    ShowError, UpdatingLibrary,
};
use crate::model::{InstallType, LibraryAnalysisResult, PatternLibrary, Project};

use super::error::HostError;
use super::traits::{DialogKind, FileDialogOptions, FileFilter};
use super::{resolve_app, HostContext};

/// The fields of `package.json` the workflow reads.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageManifest {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

fn manifest_dialog() -> FileDialogOptions {
    FileDialogOptions {
        kind: DialogKind::Open,
        title: "Connect Pattern Library".to_string(),
        message: "Select a package.json file in the root of a library you want to connect"
            .to_string(),
        filters: vec![FileFilter::new("package.json", &["json"])],
    }
}

pub async fn read_manifest(ctx: &HostContext, path: &Path) -> Result<PackageManifest, HostError> {
    let text = ctx.host.read_file(path).await?;
    serde_json::from_str(&text).map_err(|source| HostError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}

/// The project library a connection replaces: by explicit id first, else by package name.
fn previous_library<'a>(
    project: &'a Project,
    requested: Option<&str>,
    manifest: &PackageManifest,
) -> Option<&'a PatternLibrary> {
    let library = project.pattern_library();
    let by_id = requested.is_some_and(|id| id == library.id);
    (by_id || library.name == manifest.name).then_some(library)
}

pub async fn connect_pattern_library(
    message: &Message,
    request: &ConnectLibraryRequest,
    ctx: &HostContext,
) {
    let Some(app) = resolve_app(message, ctx) else {
        return;
    };

    let Some(project) = ctx.data_host.get_project(&request.project_id).await else {
        ctx.host
            .log(&format!("Project {} not found, aborting library connection", request.project_id));
        tracing::warn!(project = %request.project_id, "Project not found, aborting library connection");
        if ctx.config.host.report_resolution_failures {
            app.send(Message::reply_to(
                message,
                MessageBody::ShowError(ShowError {
                    message: "Sorry, the project to connect this library to is not open.".to_string(),
                    detail: String::new(),
                    help: String::new(),
                    error: ErrorDetail {
                        message: format!("Unknown project {}", request.project_id),
                        stack: String::new(),
                    },
                }),
            ));
        }
        return;
    };

    let Some(manifest_path) = ctx.host.select_file(manifest_dialog()).await else {
        ctx.host.log("Library connection cancelled");
        tracing::debug!(project = %project.id(), "Manifest dialog cancelled");
        return;
    };

    let manifest = match read_manifest(ctx, &manifest_path).await {
        Ok(manifest) => manifest,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to read package manifest");
            app.send(Message::reply_to(
                message,
                MessageBody::ShowError(library_error(ctx, err.to_string(), None)),
            ));
            return;
        }
    };

    let previous = previous_library(&project, request.library.as_deref(), &manifest);
    if let Some(previous) = previous {
        tracing::info!(library = %previous.id, package = %manifest.name, "Updating pattern library");
        app.send(Message::reply_to(
            message,
            MessageBody::UpdatingPatternLibrary(UpdatingLibrary {
                library_id: previous.id.clone(),
            }),
        ));
    }

    let directory = manifest_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    let analysis = match ctx.analyzer.analyze(&directory, previous).await {
        LibraryAnalysisResult::Success { result } => result,
        LibraryAnalysisResult::Error { error } => {
            ctx.host.log(&format!("Library analysis failed: {}", error.message));
            tracing::warn!(directory = %directory.display(), error = %error.message, "Library analysis failed");
            app.send(Message::reply_to(
                message,
                MessageBody::ShowError(library_error(ctx, error.message, error.stack)),
            ));
            return;
        }
    };

    let connection = LibraryConnection {
        id: analysis.library_id(),
        path: analysis.path.clone(),
    };
    if let Err(err) = ctx.data_host.add_connection(&project, connection).await {
        tracing::warn!(library = %analysis.library_id(), error = %err, "Failed to persist library connection");
    }

    let previous_library_id = previous.map(|library| library.id.clone());
    tracing::info!(
        library = %analysis.library_id(),
        previous = ?previous_library_id,
        "Pattern library analyzed"
    );
    let response = LibraryResponse {
        analysis,
        path: manifest_path,
        previous_library_id,
        install_type: InstallType::Local,
    };

    let body = if response.previous_library_id.is_some() {
        MessageBody::UpdatePatternLibraryResponse(response)
    } else {
        MessageBody::ConnectPatternLibraryResponse(response)
    };
    app.send(Message::respond_to(message, body));
}

fn library_error(ctx: &HostContext, message: String, stack: Option<String>) -> ShowError {
    let texts = &ctx.config.library;
    ShowError {
        message: texts.incompatible_message.clone(),
        detail: texts.incompatible_detail.clone(),
        help: texts.help_url.clone(),
        error: ErrorDetail {
            message,
            stack: stack.unwrap_or_default(),
        },
    }
}
