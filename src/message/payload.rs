//! Payload shapes carried by messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::{
    Element, ElementContent, InstallType, LibraryAnalysis, Page, PatternLibrary, ProjectDocument,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartApp {
    pub port: u16,
}

/// A project document, optionally with the file it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub contents: ProjectDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseFileRequest {
    #[serde(default)]
    pub silent: bool,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFileRequest {
    #[serde(default)]
    pub path: Option<PathBuf>,
    pub contents: ProjectDocument,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFile {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryCheck {
    pub id: String,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectLibraryRequest {
    pub project_id: String,
    /// Library to update; matched by package name when absent.
    #[serde(default)]
    pub library: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryResponse {
    pub analysis: LibraryAnalysis,
    pub path: PathBuf,
    #[serde(default)]
    pub previous_library_id: Option<String>,
    pub install_type: InstallType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatingLibrary {
    pub library_id: String,
}

/// Record of a library connected to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryConnection {
    pub id: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedLibrary {
    pub project_id: String,
    pub id: String,
    pub path: PathBuf,
    /// The library as the renderer imported it.
    pub library: PatternLibrary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

/// User-facing error with guidance and the underlying diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowError {
    pub message: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub help: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRef {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightElement {
    #[serde(default)]
    pub element: Option<Element>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewPlaceholder {
    pub target_element_id: String,
    pub target_content_id: String,
    pub is_sibling_drop: bool,
    /// Asset value for the placeholder's `src` property.
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedFile {
    pub path: PathBuf,
    pub target_element_id: String,
    pub target_content_id: String,
    pub is_sibling_drop: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChange {
    pub page_id: String,
    pub pages: Vec<Page>,
    pub element_contents: Vec<ElementContent>,
    pub elements: Vec<Element>,
}
