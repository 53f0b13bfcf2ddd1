//! Graph snapshot model.
//!
//! # Responsibility
//! - Define `Node`, `Edge` and the `Graph` snapshot they live in.
//! - Provide structural helpers shared by the merge, layout and edit engines.
//!
//! # Invariants
//! - `Graph.nodes` keys always equal the contained node's `id`.
//! - `insert_edge` never stores a second edge for the same `(source, target)`.
//! - Edge insertion order is preserved; layout uses it as a deterministic
//!   tie-break when choosing a drawing parent.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stable identifier of a graph node.
///
/// Either the canonicalized form of a label or a generated unique token for
/// user-created nodes.
pub type NodeId = String;

/// Role of a node in the interest hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Top-level anchor category (e.g. "Music").
    Root,
    /// Intermediate grouping level.
    Category,
    /// Concrete leaf interest (e.g. a band or a team).
    Entity,
}

/// 2D coordinate. Meaningful only after layout; zero at creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One interest node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Display label; not required to be unique.
    pub label: String,
    pub kind: NodeKind,
    /// Open string-keyed map of auxiliary facts (e.g. `genre: "Metalcore"`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,
    #[serde(default)]
    pub position: Position,
    /// Explicit color set only by user action, never by the engines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_override: Option<String>,
}

impl Node {
    /// Creates a node with empty attributes and zero position.
    pub fn new(id: impl Into<NodeId>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            attributes: BTreeMap::new(),
            position: Position::default(),
            color_override: None,
        }
    }
}

/// A directed relation `source -> target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    /// Builds the deterministic edge id for an ordered node pair.
    pub fn id_for(source: &str, target: &str) -> String {
        format!("{source}-{target}")
    }

    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: Self::id_for(&source, &target),
            source,
            target,
        }
    }
}

/// Immutable-by-convention snapshot of the interest graph.
///
/// Every engine operation takes a snapshot and returns a new one; callers
/// replace their copy wholesale instead of mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: BTreeMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Inserts or replaces a node under its own id.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn has_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|edge| edge.source == source && edge.target == target)
    }

    /// Appends an edge unless the exact `(source, target)` pair already exists.
    ///
    /// Returns `true` when an edge was actually added.
    pub fn insert_edge(&mut self, source: &str, target: &str) -> bool {
        if self.has_edge(source, target) {
            return false;
        }
        self.edges.push(Edge::new(source, target));
        true
    }

    /// Ids of direct children of `parent`, in edge insertion order.
    pub fn children_of(&self, parent: &str) -> Vec<&NodeId> {
        self.edges
            .iter()
            .filter(|edge| edge.source == parent)
            .map(|edge| &edge.target)
            .collect()
    }

    /// Ids of direct parents of `child`, in edge insertion order.
    pub fn parents_of(&self, child: &str) -> Vec<&NodeId> {
        self.edges
            .iter()
            .filter(|edge| edge.target == child)
            .map(|edge| &edge.source)
            .collect()
    }

    pub fn has_incoming_edge(&self, id: &str) -> bool {
        self.edges.iter().any(|edge| edge.target == id)
    }

    /// Top-level nodes: kind `Root`, or no incoming edge at all.
    ///
    /// Multiple unrelated top categories coexist, so both conditions count.
    pub fn top_level_nodes(&self) -> Vec<&Node> {
        self.nodes
            .values()
            .filter(|node| node.kind == NodeKind::Root || !self.has_incoming_edge(&node.id))
            .collect()
    }

    /// Labels of all `Root` nodes, used as generation context.
    pub fn root_labels(&self) -> Vec<String> {
        self.nodes
            .values()
            .filter(|node| node.kind == NodeKind::Root)
            .map(|node| node.label.clone())
            .collect()
    }

    /// Whether `to` is reachable from `from` by following outgoing edges.
    pub fn is_reachable(&self, from: &str, to: &str) -> bool {
        if from == to {
            return true;
        }
        let mut queue = vec![from];
        let mut seen: std::collections::BTreeSet<&str> = [from].into_iter().collect();
        while let Some(current) = queue.pop() {
            for edge in self.edges.iter().filter(|edge| edge.source == current) {
                if edge.target == to {
                    return true;
                }
                if seen.insert(edge.target.as_str()) {
                    queue.push(edge.target.as_str());
                }
            }
        }
        false
    }
}
