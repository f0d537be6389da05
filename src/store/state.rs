//! View-level state of a renderer session.

use crate::model::{Page, Subtree};

/// Screen the renderer shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    SplashScreen,
    Pages,
    PageDetail,
}

/// Kind of item that owns keyboard focus and receives edit commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemType {
    Element,
    Page,
    #[default]
    None,
}

/// Startup handshake with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppState {
    #[default]
    Starting,
    Started,
}

impl AppState {
    pub fn is_started(&self) -> bool {
        matches!(self, Self::Started)
    }
}

/// What the last copy or cut captured.
///
/// Holds the snapshot with its original ids; pasting always inserts a fresh-id copy.
#[derive(Debug, Clone, PartialEq)]
pub enum Clipboard {
    Element(Subtree),
    Page { page: Page, subtree: Subtree },
}

impl Clipboard {
    pub fn item_type(&self) -> ItemType {
        match self {
            Self::Element(_) => ItemType::Element,
            Self::Page { .. } => ItemType::Page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(View::default(), View::SplashScreen);
        assert_eq!(ItemType::default(), ItemType::None);
        assert!(!AppState::default().is_started());
    }

    #[test]
    fn clipboard_item_type() {
        let subtree = Subtree {
            root_id: "e1".to_string(),
            elements: Vec::new(),
            contents: Vec::new(),
        };
        assert_eq!(
            Clipboard::Element(subtree.clone()).item_type(),
            ItemType::Element
        );
        let page = Page {
            id: "p1".to_string(),
            name: "Page".to_string(),
            root_id: "e1".to_string(),
        };
        assert_eq!(Clipboard::Page { page, subtree }.item_type(), ItemType::Page);
    }
}
