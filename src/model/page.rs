use serde::{Deserialize, Serialize};

use super::element::Subtree;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub name: String,
    /// Root element; never listed in any content.
    pub root_id: String,
}

/// A page removed from the project, with its element tree and former index.
#[derive(Debug, Clone, PartialEq)]
pub struct DetachedPage {
    pub page: Page,
    pub index: usize,
    pub subtree: Subtree,
}
