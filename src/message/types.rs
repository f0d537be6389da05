use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payload::{
    ConnectLibraryRequest, ConnectedLibrary, CreateNewPlaceholder, DroppedFile, ElementRef,
    HighlightElement, LibraryCheck, LibraryResponse, PageChange, ProjectFile, SaveFileRequest,
    SavedFile, ShowError, StartApp, UpdatingLibrary, UseFileRequest,
};
use crate::model::{PatternLibrary, ProjectDocument};

/// Discriminant of every message kind on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    AppLoaded,
    StartApp,
    CreateNewFileRequest,
    CreateNewFileResponse,
    OpenFileRequest,
    OpenFileResponse,
    UseFileRequest,
    SaveFileRequest,
    SaveFileResponse,
    OpenExternalUrl,
    CheckLibraryRequest,
    CheckLibraryResponse,
    ConnectPatternLibraryRequest,
    ConnectPatternLibraryResponse,
    UpdatePatternLibraryResponse,
    UpdatingPatternLibrary,
    ConnectedPatternLibraryNotification,
    ShowError,
    CreateNewPage,
    SelectElement,
    UnselectElement,
    HighlightElement,
    Undo,
    Redo,
    Cut,
    CutElement,
    Copy,
    CopyElement,
    Paste,
    PasteElementBelow,
    PasteElementInside,
    Delete,
    DeleteElement,
    Duplicate,
    DuplicateElement,
    CreateNewPlaceholder,
    DroppedFile,
    PatternLibraryChange,
    PageChange,
    ElementChange,
}

/// Typed payload of a message; the variant is the message type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum MessageBody {
    AppLoaded,
    StartApp(StartApp),
    CreateNewFileRequest,
    CreateNewFileResponse(ProjectFile),
    OpenFileRequest,
    OpenFileResponse(ProjectFile),
    UseFileRequest(UseFileRequest),
    SaveFileRequest(SaveFileRequest),
    SaveFileResponse(SavedFile),
    OpenExternalUrl(String),
    CheckLibraryRequest(ProjectDocument),
    CheckLibraryResponse(Vec<LibraryCheck>),
    ConnectPatternLibraryRequest(ConnectLibraryRequest),
    ConnectPatternLibraryResponse(LibraryResponse),
    UpdatePatternLibraryResponse(LibraryResponse),
    UpdatingPatternLibrary(UpdatingLibrary),
    ConnectedPatternLibraryNotification(ConnectedLibrary),
    ShowError(ShowError),
    CreateNewPage,
    SelectElement(ElementRef),
    UnselectElement,
    HighlightElement(HighlightElement),
    Undo,
    Redo,
    Cut,
    CutElement(String),
    Copy,
    CopyElement(String),
    Paste,
    PasteElementBelow(String),
    PasteElementInside(String),
    Delete,
    DeleteElement(String),
    Duplicate,
    DuplicateElement(String),
    CreateNewPlaceholder(CreateNewPlaceholder),
    DroppedFile(DroppedFile),
    PatternLibraryChange(PatternLibrary),
    PageChange(PageChange),
    ElementChange(Option<String>),
}

impl MessageBody {
    pub fn message_type(&self) -> MessageType {
        match self {
            MessageBody::AppLoaded => MessageType::AppLoaded,
            MessageBody::StartApp(_) => MessageType::StartApp,
            MessageBody::CreateNewFileRequest => MessageType::CreateNewFileRequest,
            MessageBody::CreateNewFileResponse(_) => MessageType::CreateNewFileResponse,
            MessageBody::OpenFileRequest => MessageType::OpenFileRequest,
            MessageBody::OpenFileResponse(_) => MessageType::OpenFileResponse,
            MessageBody::UseFileRequest(_) => MessageType::UseFileRequest,
            MessageBody::SaveFileRequest(_) => MessageType::SaveFileRequest,
            MessageBody::SaveFileResponse(_) => MessageType::SaveFileResponse,
            MessageBody::OpenExternalUrl(_) => MessageType::OpenExternalUrl,
            MessageBody::CheckLibraryRequest(_) => MessageType::CheckLibraryRequest,
            MessageBody::CheckLibraryResponse(_) => MessageType::CheckLibraryResponse,
            MessageBody::ConnectPatternLibraryRequest(_) => {
                MessageType::ConnectPatternLibraryRequest
            }
            MessageBody::ConnectPatternLibraryResponse(_) => {
                MessageType::ConnectPatternLibraryResponse
            }
            MessageBody::UpdatePatternLibraryResponse(_) => {
                MessageType::UpdatePatternLibraryResponse
            }
            MessageBody::UpdatingPatternLibrary(_) => MessageType::UpdatingPatternLibrary,
            MessageBody::ConnectedPatternLibraryNotification(_) => {
                MessageType::ConnectedPatternLibraryNotification
            }
            MessageBody::ShowError(_) => MessageType::ShowError,
            MessageBody::CreateNewPage => MessageType::CreateNewPage,
            MessageBody::SelectElement(_) => MessageType::SelectElement,
            MessageBody::UnselectElement => MessageType::UnselectElement,
            MessageBody::HighlightElement(_) => MessageType::HighlightElement,
            MessageBody::Undo => MessageType::Undo,
            MessageBody::Redo => MessageType::Redo,
            MessageBody::Cut => MessageType::Cut,
            MessageBody::CutElement(_) => MessageType::CutElement,
            MessageBody::Copy => MessageType::Copy,
            MessageBody::CopyElement(_) => MessageType::CopyElement,
            MessageBody::Paste => MessageType::Paste,
            MessageBody::PasteElementBelow(_) => MessageType::PasteElementBelow,
            MessageBody::PasteElementInside(_) => MessageType::PasteElementInside,
            MessageBody::Delete => MessageType::Delete,
            MessageBody::DeleteElement(_) => MessageType::DeleteElement,
            MessageBody::Duplicate => MessageType::Duplicate,
            MessageBody::DuplicateElement(_) => MessageType::DuplicateElement,
            MessageBody::CreateNewPlaceholder(_) => MessageType::CreateNewPlaceholder,
            MessageBody::DroppedFile(_) => MessageType::DroppedFile,
            MessageBody::PatternLibraryChange(_) => MessageType::PatternLibraryChange,
            MessageBody::PageChange(_) => MessageType::PageChange,
            MessageBody::ElementChange(_) => MessageType::ElementChange,
        }
    }
}

/// One message instance.
///
/// `transaction` ties a request to its responses; `app_id` names the app
/// window the message belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub transaction: Option<Uuid>,
    pub app_id: Option<String>,
    pub body: MessageBody,
}

impl Message {
    pub fn new(body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction: None,
            app_id: None,
            body,
        }
    }

    pub fn with_transaction(mut self, transaction: Uuid) -> Self {
        self.transaction = Some(transaction);
        self
    }

    pub fn with_app(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    /// A follow-up in the same transaction with its own id.
    pub fn reply_to(request: &Message, body: MessageBody) -> Self {
        Self {
            id: Uuid::new_v4(),
            transaction: request.transaction,
            app_id: request.app_id.clone(),
            body,
        }
    }

    /// The response to `request`, echoing its id and transaction.
    pub fn respond_to(request: &Message, body: MessageBody) -> Self {
        Self {
            id: request.id,
            transaction: request.transaction,
            app_id: request.app_id.clone(),
            body,
        }
    }

    pub fn message_type(&self) -> MessageType {
        self.body.message_type()
    }
}
