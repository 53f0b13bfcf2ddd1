//! Path-merge engine.
//!
//! # Responsibility
//! - Fold an ordered root-to-leaf path into a graph snapshot, traversing into
//!   existing nodes and creating only what is missing.
//!
//! # Invariants
//! - Pure: the input snapshot is never mutated; a new one is returned.
//! - Validation happens before any mutation; a malformed path leaves no trace.
//! - No duplicate `(source, target)` edge is ever created.
//! - Existing nodes reached as cross-links keep their label and attributes.

use crate::canon::{canonicalize, is_same_node};
use crate::model::graph::{Graph, Node, NodeId, NodeKind};
use crate::model::path::{PathStep, StepKind};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for a path, detected before the graph is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The path contains no steps.
    EmptyPath,
    /// A step name is blank after trimming.
    BlankStepName { index: usize },
}

impl Display for MergeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "path contains no steps"),
            Self::BlankStepName { index } => {
                write!(f, "path step {index} has a blank name")
            }
        }
    }
}

impl Error for MergeError {}

/// Merges `path` into `graph`, returning the new snapshot.
///
/// Walks the steps in order keeping a current parent. Each step either
/// traverses into a fuzzy-matched sibling, or creates/reuses a node under the
/// canonical id and wires an idempotent edge from the parent.
///
/// Re-merging an identical path is a no-op; partially overlapping paths reuse
/// every node they share with earlier merges.
pub fn merge_path(graph: &Graph, path: &[PathStep]) -> Result<Graph, MergeError> {
    validate_path(path)?;

    let mut merged = graph.clone();
    let mut parent_id: Option<NodeId> = None;

    info!(
        "event=merge_path module=merge status=start steps={} nodes={} edges={}",
        path.len(),
        merged.nodes.len(),
        merged.edges.len()
    );

    for (index, step) in path.iter().enumerate() {
        let canonical_id = canonicalize(&step.name);

        if let Some(matched) = find_sibling_match(&merged, parent_id.as_deref(), step, &canonical_id)
        {
            // Traversal branch: concept already present under this parent.
            debug!(
                "event=merge_step module=merge status=traverse index={index} node_id={matched}"
            );
            parent_id = Some(matched);
            continue;
        }

        // Creation branch. A node under the canonical id anywhere in the graph
        // is reused unmodified (cross-link); otherwise a fresh node is created.
        if !merged.contains(&canonical_id) {
            let kind = match (parent_id.as_deref(), step.kind) {
                (None, StepKind::Category) => NodeKind::Root,
                (_, StepKind::Category) => NodeKind::Category,
                (_, StepKind::Entity) => NodeKind::Entity,
            };
            // Labels are stored trimmed; canonicalization strips the same
            // surrounding whitespace from the id.
            let mut node = Node::new(canonical_id.clone(), step.name.trim(), kind);
            node.attributes = step.attributes.clone();
            debug!(
                "event=merge_step module=merge status=create index={index} node_id={canonical_id}"
            );
            merged.add_node(node);
        } else {
            debug!(
                "event=merge_step module=merge status=cross_link index={index} node_id={canonical_id}"
            );
        }

        if let Some(parent) = parent_id.as_deref() {
            // A cross-link back into an ancestor chain would close a cycle in
            // a graph that is a hierarchy by intent. Reuse the node but skip
            // the edge in that case.
            if merged.is_reachable(&canonical_id, parent) {
                warn!(
                    "event=merge_step module=merge status=cycle_skipped index={index} \
                     source={parent} target={canonical_id}"
                );
            } else {
                merged.insert_edge(parent, &canonical_id);
            }
        }

        parent_id = Some(canonical_id);
    }

    info!(
        "event=merge_path module=merge status=ok nodes={} edges={}",
        merged.nodes.len(),
        merged.edges.len()
    );
    Ok(merged)
}

/// Rejects malformed paths before any mutation.
fn validate_path(path: &[PathStep]) -> Result<(), MergeError> {
    if path.is_empty() {
        return Err(MergeError::EmptyPath);
    }
    for (index, step) in path.iter().enumerate() {
        if step.name.trim().is_empty() {
            return Err(MergeError::BlankStepName { index });
        }
    }
    Ok(())
}

/// Runs the matcher over the candidate sibling set of the current parent.
///
/// With a parent set, candidates are the parent's edge-targets; at top level
/// they are root-kind nodes and nodes without any incoming edge.
fn find_sibling_match(
    graph: &Graph,
    parent_id: Option<&str>,
    step: &PathStep,
    canonical_id: &str,
) -> Option<NodeId> {
    match parent_id {
        Some(parent) => graph
            .children_of(parent)
            .into_iter()
            .filter_map(|id| graph.node(id))
            .find(|node| is_same_node(&node.label, &step.name, &node.id, canonical_id))
            .map(|node| node.id.clone()),
        None => graph
            .top_level_nodes()
            .into_iter()
            .find(|node| is_same_node(&node.label, &step.name, &node.id, canonical_id))
            .map(|node| node.id.clone()),
    }
}
