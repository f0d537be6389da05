use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::analysis::{InstallType, LibraryAnalysis, PatternAnalysis};
use super::new_id;

/// Built-in library name for freshly created projects.
pub const BUILTIN_LIBRARY_NAME: &str = "Built-in Components";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PatternLibraryState {
    #[default]
    Pristine,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternType {
    Pattern,
    SyntheticPage,
    SyntheticBox,
    SyntheticText,
    SyntheticPlaceholder,
}

impl PatternType {
    pub fn is_synthetic(self) -> bool {
        !matches!(self, PatternType::Pattern)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    Boolean,
    Number,
    String,
    Asset,
    Enum,
    Href,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotType {
    Children,
    Property,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternProperty {
    pub id: String,
    pub name: String,
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternSlot {
    pub id: String,
    pub name: String,
    pub slot_type: SlotType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub name: String,
    pub pattern_type: PatternType,
    #[serde(default)]
    pub properties: Vec<PatternProperty>,
    #[serde(default)]
    pub slots: Vec<PatternSlot>,
}

impl Pattern {
    pub fn get_property_by_name(&self, name: &str) -> Option<&PatternProperty> {
        self.properties.iter().find(|property| property.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternLibrary {
    pub id: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub state: PatternLibraryState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_type: Option<InstallType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

/// Outcome of re-importing a library over an existing one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Patterns whose ids survived because their names matched.
    pub retained: usize,
    /// Patterns new to this library.
    pub added: usize,
    /// Ids of previously imported patterns that no longer exist.
    pub removed: Vec<String>,
    /// Elements flagged because their pattern is gone.
    pub orphaned_elements: Vec<String>,
}

impl PatternLibrary {
    /// An unconnected library holding only the synthetic patterns.
    pub fn pristine() -> Self {
        Self {
            id: new_id(),
            name: BUILTIN_LIBRARY_NAME.to_string(),
            version: "1.0.0".to_string(),
            state: PatternLibraryState::Pristine,
            install_type: None,
            path: None,
            patterns: synthetic_patterns(),
        }
    }

    pub fn get_pattern_by_id(&self, id: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.id == id)
    }

    pub fn get_pattern_by_type(&self, pattern_type: PatternType) -> Option<&Pattern> {
        self.patterns
            .iter()
            .find(|pattern| pattern.pattern_type == pattern_type)
    }

    /// Replace the imported patterns with `analysis`.
    ///
    /// Synthetic patterns are kept. A pattern, property or slot whose name
    /// matches one imported before keeps its previous id so that elements
    /// built from it stay bound.
    pub fn import(
        &mut self,
        analysis: &LibraryAnalysis,
        path: &Path,
        install_type: InstallType,
    ) -> ImportReport {
        let mut report = ImportReport::default();
        let (synthetic, previous): (Vec<Pattern>, Vec<Pattern>) = self
            .patterns
            .drain(..)
            .partition(|pattern| pattern.pattern_type.is_synthetic());

        let mut patterns = synthetic;
        for candidate in &analysis.patterns {
            let matched = previous
                .iter()
                .find(|pattern| pattern.name == candidate.name);
            if matched.is_some() {
                report.retained += 1;
            } else {
                report.added += 1;
            }
            patterns.push(merge_pattern(candidate, matched));
        }

        report.removed = previous
            .iter()
            .filter(|pattern| {
                !analysis
                    .patterns
                    .iter()
                    .any(|candidate| candidate.name == pattern.name)
            })
            .map(|pattern| pattern.id.clone())
            .collect();

        self.id = analysis.library_id();
        self.name = analysis.name.clone();
        self.version = analysis.version.clone();
        self.path = Some(path.to_path_buf());
        self.install_type = Some(install_type);
        self.state = PatternLibraryState::Connected;
        self.patterns = patterns;

        tracing::debug!(
            library = %self.id,
            retained = report.retained,
            added = report.added,
            removed = report.removed.len(),
            "Imported pattern library"
        );

        report
    }
}

fn merge_pattern(candidate: &PatternAnalysis, previous: Option<&Pattern>) -> Pattern {
    let properties = candidate
        .properties
        .iter()
        .map(|property| PatternProperty {
            id: previous
                .and_then(|pattern| pattern.get_property_by_name(&property.name))
                .map(|existing| existing.id.clone())
                .unwrap_or_else(|| property.id.clone()),
            name: property.name.clone(),
            property_type: property.property_type,
            default_value: property.default_value.clone(),
        })
        .collect();

    let slots = candidate
        .slots
        .iter()
        .map(|slot| PatternSlot {
            id: previous
                .and_then(|pattern| pattern.slots.iter().find(|s| s.name == slot.name))
                .map(|existing| existing.id.clone())
                .unwrap_or_else(|| slot.id.clone()),
            name: slot.name.clone(),
            slot_type: slot.slot_type,
        })
        .collect();

    Pattern {
        id: previous
            .map(|pattern| pattern.id.clone())
            .unwrap_or_else(|| candidate.id.clone()),
        name: candidate.name.clone(),
        pattern_type: candidate.pattern_type,
        properties,
        slots,
    }
}

fn synthetic_patterns() -> Vec<Pattern> {
    let children = |owner: &str| PatternSlot {
        id: format!("synthetic:{}:children", owner),
        name: "children".to_string(),
        slot_type: SlotType::Children,
    };

    vec![
        Pattern {
            id: "synthetic:page".to_string(),
            name: "Page".to_string(),
            pattern_type: PatternType::SyntheticPage,
            properties: Vec::new(),
            slots: vec![children("page")],
        },
        Pattern {
            id: "synthetic:box".to_string(),
            name: "Box".to_string(),
            pattern_type: PatternType::SyntheticBox,
            properties: vec![PatternProperty {
                id: "synthetic:box:flex".to_string(),
                name: "flex".to_string(),
                property_type: PropertyType::Boolean,
                default_value: Some(Value::Bool(true)),
            }],
            slots: vec![children("box")],
        },
        Pattern {
            id: "synthetic:text".to_string(),
            name: "Text".to_string(),
            pattern_type: PatternType::SyntheticText,
            properties: vec![PatternProperty {
                id: "synthetic:text:text".to_string(),
                name: "text".to_string(),
                property_type: PropertyType::String,
                default_value: Some(Value::String("Text".to_string())),
            }],
            slots: Vec::new(),
        },
        Pattern {
            id: "synthetic:placeholder".to_string(),
            name: "Image".to_string(),
            pattern_type: PatternType::SyntheticPlaceholder,
            properties: vec![PatternProperty {
                id: "synthetic:placeholder:src".to_string(),
                name: "src".to_string(),
                property_type: PropertyType::Asset,
                default_value: None,
            }],
            slots: Vec::new(),
        },
    ]
}
