use thiserror::Error;

/// Errors raised when the project tree would become inconsistent.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Element '{id}' not found")]
    MissingElement { id: String },

    #[error("Element content '{id}' not found")]
    MissingContent { id: String },

    #[error("Page '{id}' not found")]
    MissingPage { id: String },

    #[error("Duplicate id '{id}'")]
    DuplicateId { id: String },

    #[error("'{owner}' references unknown id '{id}'")]
    DanglingReference { owner: String, id: String },

    #[error("Element '{element}' appears {count} times in content '{content}'")]
    MembershipMismatch {
        element: String,
        content: String,
        count: usize,
    },

    #[error("Element '{element}' is nested inside itself")]
    Cycle { element: String },

    #[error("Index {index} out of bounds for '{container}' (len {len})")]
    IndexOutOfBounds {
        container: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid project document: {0}")]
    Json(#[from] serde_json::Error),
}
