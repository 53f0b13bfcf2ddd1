//! Text-generation collaborator boundary.
//!
//! # Responsibility
//! - Define the provider interface the app plugs a concrete model client into.
//! - Build the generation prompt from the current graph snapshot.
//! - Parse and validate provider output before it reaches the merge engine.
//!
//! # Invariants
//! - A provider failure or malformed output never mutates the graph; both
//!   surface as a retryable [`GenerateError`].
//! - Validation accepts only non-empty paths with non-blank step names.

use crate::model::graph::{Graph, NodeKind};
use crate::model::path::GeneratedPath;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failures of the external generation step.
#[derive(Debug)]
pub enum GenerateError {
    /// The provider call itself failed (network, quota, service error).
    Provider(String),
    /// The provider answered, but the text does not validate as a path.
    MalformedOutput(String),
}

impl Display for GenerateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider(message) => write!(f, "generation provider failed: {message}"),
            Self::MalformedOutput(message) => {
                write!(f, "generation output is malformed: {message}")
            }
        }
    }
}

impl Error for GenerateError {}

/// Compact snapshot summary handed to the provider so it can reuse existing
/// categories instead of inventing near-duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationContext {
    /// Labels of current root categories.
    pub root_labels: Vec<String>,
    /// One line per node: label, kind, and direct child labels.
    pub outline: Vec<NodeOutline>,
}

/// Parent-child summary of one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOutline {
    pub label: String,
    pub kind: NodeKind,
    pub children: Vec<String>,
}

impl GenerationContext {
    /// Summarizes a snapshot for prompt context.
    pub fn from_graph(graph: &Graph) -> Self {
        let outline = graph
            .nodes
            .values()
            .map(|node| NodeOutline {
                label: node.label.clone(),
                kind: node.kind,
                children: graph
                    .children_of(&node.id)
                    .into_iter()
                    .filter_map(|id| graph.node(id))
                    .map(|child| child.label.clone())
                    .collect(),
            })
            .collect();
        Self {
            root_labels: graph.root_labels(),
            outline,
        }
    }
}

/// Interface to the external text-generation service.
///
/// Implementations are expected to be slow and fallible; callers must
/// serialize requests through the service layer's in-flight guard.
pub trait PathGenerator {
    /// Returns a disambiguated root-to-leaf path for a free-text query.
    fn generate(
        &self,
        query: &str,
        context: &GenerationContext,
    ) -> Result<GeneratedPath, GenerateError>;
}

impl<T: PathGenerator + ?Sized> PathGenerator for &T {
    fn generate(
        &self,
        query: &str,
        context: &GenerationContext,
    ) -> Result<GeneratedPath, GenerateError> {
        (**self).generate(query, context)
    }
}

/// Builds the ontology prompt for a query against the current context.
pub fn build_prompt(query: &str, context: &GenerationContext) -> String {
    format!(
        "You are an expert ontology engineer.\n\
         Identify the possible meanings of the term '{query}'.\n\n\
         Context (Existing Root Categories): {roots}\n\n\
         If it fits an existing root category, map it there. If it requires a \
         new category, define it.\n\
         Output a hierarchical path from Root -> Leaf.\n\n\
         Return ONLY valid JSON matching this schema (no markdown formatting):\n\
         {{\n\
         \x20 \"disambiguation\": \"string description of what this is\",\n\
         \x20 \"path\": [\n\
         \x20   {{ \"name\": \"Root Category\", \"type\": \"category\" }},\n\
         \x20   {{ \"name\": \"Sub Category\", \"type\": \"category\" }},\n\
         \x20   {{ \"name\": \"Entity Name\", \"type\": \"entity\", \"attributes\": {{ \"key\": \"value\" }} }}\n\
         \x20 ]\n\
         }}",
        roots = context.root_labels.join(", ")
    )
}

static CODE_FENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```json\n?|\n?```").expect("fence pattern is valid"));

/// Parses raw provider text into a validated [`GeneratedPath`].
///
/// Tolerates markdown code fences around the JSON body, since models add them
/// even when told not to.
pub fn parse_generated_path(text: &str) -> Result<GeneratedPath, GenerateError> {
    let clean = CODE_FENCES.replace_all(text, "");
    let clean = clean.trim();
    if clean.is_empty() {
        return Err(GenerateError::MalformedOutput(
            "empty response body".to_string(),
        ));
    }

    let parsed: GeneratedPath = serde_json::from_str(clean)
        .map_err(|err| GenerateError::MalformedOutput(err.to_string()))?;

    if parsed.path.is_empty() {
        return Err(GenerateError::MalformedOutput(
            "path contains no steps".to_string(),
        ));
    }
    if let Some(index) = parsed
        .path
        .iter()
        .position(|step| step.name.trim().is_empty())
    {
        return Err(GenerateError::MalformedOutput(format!(
            "path step {index} has a blank name"
        )));
    }

    Ok(parsed)
}
