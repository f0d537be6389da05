//! Typed message protocol shared by the renderer and the host.
//!
//! Every message kind is one [`MessageBody`] variant, so routers match
//! exhaustively and a new kind is a compile error at every dispatch site.

mod codec;
mod payload;
mod types;

pub use codec::{decode, encode, CodecError};
pub use payload::{
    ConnectLibraryRequest, ConnectedLibrary, CreateNewPlaceholder, DroppedFile, ElementRef,
    ErrorDetail, HighlightElement, LibraryCheck, LibraryConnection, LibraryResponse, PageChange,
    ProjectFile, SaveFileRequest, SavedFile, ShowError, StartApp, UpdatingLibrary, UseFileRequest,
};
pub use types::{Message, MessageBody, MessageType};
