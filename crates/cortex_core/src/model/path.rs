//! Externally supplied path schema.
//!
//! # Responsibility
//! - Mirror the JSON shape returned by the text-generation collaborator.
//!
//! # Invariants
//! - A path is ordered root-to-leaf; the final step is typically an entity.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Kind of a single path step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Category,
    Entity,
}

/// One element of a hierarchical interest path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStep {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
}

impl PathStep {
    pub fn category(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Category,
            attributes: BTreeMap::new(),
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StepKind::Entity,
            attributes: BTreeMap::new(),
        }
    }
}

/// Full output of the text-generation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedPath {
    /// Human-readable description of which meaning of the query was chosen.
    pub disambiguation: String,
    /// Root-to-leaf ordered steps.
    pub path: Vec<PathStep>,
}
