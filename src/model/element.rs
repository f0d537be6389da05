use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::library::Pattern;
use super::new_id;

/// A placed instance of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub name: String,
    pub pattern_id: String,
    #[serde(default)]
    pub properties: Vec<ElementProperty>,
    #[serde(default)]
    pub content_ids: Vec<String>,
    /// Content this element is listed in. `None` for page roots and detached elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    /// Set when the pattern this element was built from vanished on library re-import.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub orphaned: bool,
}

/// A named slot of an element holding ordered child elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementContent {
    pub id: String,
    pub name: String,
    pub slot_id: String,
    #[serde(default)]
    pub element_ids: Vec<String>,
    pub parent_id: String,
}

/// Value bound to one pattern property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperty {
    pub id: String,
    pub pattern_property_id: String,
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub set_default: bool,
}

impl ElementProperty {
    pub fn new(pattern_property_id: impl Into<String>, value: Value) -> Self {
        Self {
            id: new_id(),
            pattern_property_id: pattern_property_id.into(),
            value,
            set_default: false,
        }
    }
}

/// Position of an element inside a content list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub content_id: String,
    pub index: usize,
}

/// A self-contained element tree: the root, its descendants and their contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Subtree {
    pub root_id: String,
    pub elements: Vec<Element>,
    pub contents: Vec<ElementContent>,
}

/// A subtree removed from the project together with where it used to live.
#[derive(Debug, Clone, PartialEq)]
pub struct Detached {
    pub placement: Placement,
    pub subtree: Subtree,
}

impl Subtree {
    /// Build a single fresh element for `pattern`, with one empty content per slot.
    pub fn from_pattern(pattern: &Pattern, properties: Vec<ElementProperty>) -> Self {
        let element_id = new_id();
        let contents: Vec<ElementContent> = pattern
            .slots
            .iter()
            .map(|slot| ElementContent {
                id: new_id(),
                name: slot.name.clone(),
                slot_id: slot.id.clone(),
                element_ids: Vec::new(),
                parent_id: element_id.clone(),
            })
            .collect();

        let element = Element {
            id: element_id.clone(),
            name: pattern.name.clone(),
            pattern_id: pattern.id.clone(),
            properties,
            content_ids: contents.iter().map(|content| content.id.clone()).collect(),
            container_id: None,
            orphaned: false,
        };

        Self {
            root_id: element_id,
            elements: vec![element],
            contents,
        }
    }

    pub fn root(&self) -> Option<&Element> {
        self.elements.iter().find(|element| element.id == self.root_id)
    }

    pub fn contains_element(&self, id: &str) -> bool {
        self.elements.iter().any(|element| element.id == id)
    }

    /// Structural copy with new ids for every element, content and property.
    ///
    /// The copy's root is detached (`container_id == None`).
    pub fn with_fresh_ids(&self) -> Self {
        let element_ids: HashMap<&str, String> = self
            .elements
            .iter()
            .map(|element| (element.id.as_str(), new_id()))
            .collect();
        let content_ids: HashMap<&str, String> = self
            .contents
            .iter()
            .map(|content| (content.id.as_str(), new_id()))
            .collect();

        let element_id = |id: &str| element_ids.get(id).cloned().unwrap_or_else(|| id.to_string());
        let content_id = |id: &str| content_ids.get(id).cloned().unwrap_or_else(|| id.to_string());

        let elements = self
            .elements
            .iter()
            .map(|element| Element {
                id: element_id(&element.id),
                name: element.name.clone(),
                pattern_id: element.pattern_id.clone(),
                properties: element
                    .properties
                    .iter()
                    .map(|property| ElementProperty {
                        id: new_id(),
                        ..property.clone()
                    })
                    .collect(),
                content_ids: element.content_ids.iter().map(|id| content_id(id)).collect(),
                container_id: if element.id == self.root_id {
                    None
                } else {
                    element.container_id.as_deref().map(content_id)
                },
                orphaned: element.orphaned,
            })
            .collect();

        let contents = self
            .contents
            .iter()
            .map(|content| ElementContent {
                id: content_id(&content.id),
                name: content.name.clone(),
                slot_id: content.slot_id.clone(),
                element_ids: content.element_ids.iter().map(|id| element_id(id)).collect(),
                parent_id: element_id(&content.parent_id),
            })
            .collect();

        Self {
            root_id: element_id(&self.root_id),
            elements,
            contents,
        }
    }
}
