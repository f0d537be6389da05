//! Project tree: pages, elements, element contents and the pattern library.
//!
//! Elements are owned by the [`Project`] and addressed by id. A content lists
//! its children in order and every nested element points back at the content
//! that lists it. Edits that remove parts of the tree hand back a detached
//! snapshot so they can be reversed exactly.

mod analysis;
mod element;
mod error;
mod library;
mod page;
mod project;

pub use analysis::{
    AnalysisFailure, InstallType, LibraryAnalysis, LibraryAnalysisResult, PatternAnalysis,
    PropertyAnalysis, SlotAnalysis,
};
pub use element::{Detached, Element, ElementContent, ElementProperty, Placement, Subtree};
pub use error::ModelError;
pub use library::{
    ImportReport, Pattern, PatternLibrary, PatternLibraryState, PatternProperty, PatternSlot,
    PatternType, PropertyType, SlotType, BUILTIN_LIBRARY_NAME,
};
pub use page::{DetachedPage, Page};
pub use project::{Project, ProjectDocument};

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
