//! Result shapes of pattern library analysis.
//!
//! Analysis itself runs outside this crate; these types are what an analyzer
//! hands back and what travels inside connect/update responses.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::library::{PatternType, PropertyType, SlotType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryAnalysis {
    pub name: String,
    pub version: String,
    pub path: PathBuf,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub patterns: Vec<PatternAnalysis>,
}

impl LibraryAnalysis {
    /// Connection id under which the analyzed library is recorded.
    pub fn library_id(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternAnalysis {
    pub id: String,
    pub name: String,
    #[serde(default = "default_pattern_type")]
    pub pattern_type: PatternType,
    #[serde(default)]
    pub properties: Vec<PropertyAnalysis>,
    #[serde(default)]
    pub slots: Vec<SlotAnalysis>,
}

fn default_pattern_type() -> PatternType {
    PatternType::Pattern
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAnalysis {
    pub id: String,
    pub name: String,
    pub property_type: PropertyType,
    #[serde(default)]
    pub default_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAnalysis {
    pub id: String,
    pub name: String,
    pub slot_type: SlotType,
}

/// Diagnostic for a library that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    pub message: String,
    #[serde(default)]
    pub stack: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LibraryAnalysisResult {
    Error { error: AnalysisFailure },
    Success { result: LibraryAnalysis },
}

/// How a pattern library was brought into the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallType {
    Local,
    Remote,
}
