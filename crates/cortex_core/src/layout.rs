//! Tree layout engine.
//!
//! # Responsibility
//! - Project the multi-parent graph onto a positioned single-parent tree
//!   under a visibility filter, ready for rendering.
//!
//! # Invariants
//! - Derived only: the reduced tree is never written back into the graph.
//! - Deterministic: identical snapshot and options reproduce bit-identical
//!   positions and colors.
//! - Every visible node appears exactly once and carries exactly one edge
//!   from its chosen layout-parent (the virtual root has none).

use crate::color::{node_color, PALETTE};
use crate::model::graph::{Graph, Node, NodeId, NodeKind};
use std::collections::{BTreeMap, BTreeSet};

/// Reserved id of the synthesized viewer anchor. Contains a `:` so it can
/// never collide with a canonical id.
pub const VIRTUAL_ROOT_ID: &str = "viewer:root";

/// Horizontal distance between adjacent leaves.
pub const SIBLING_SPACING: f64 = 180.0;
/// Vertical distance between depth levels.
pub const LEVEL_SPACING: f64 = 250.0;

/// Which subset of the graph the layout shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Every node in the graph.
    Global,
    /// Only nodes lying on a root-to-selected path.
    Personal,
}

/// Layout inputs besides the graph itself.
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub mode: ViewMode,
    /// Currently selected node ids; drives the personal visibility filter.
    pub selected_ids: BTreeSet<NodeId>,
    /// Display label of the virtual root.
    pub viewer_label: String,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            mode: ViewMode::Global,
            selected_ids: BTreeSet::new(),
            viewer_label: "You".to_string(),
        }
    }
}

/// A node with resolved coordinates and display color.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
    pub color: String,
    pub selected: bool,
}

/// One drawable edge of the reduced single-parent tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledEdge {
    pub id: String,
    pub source: NodeId,
    pub target: NodeId,
    /// Renderer style hint.
    pub style: &'static str,
}

/// Full derived layout output.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub nodes: Vec<PositionedNode>,
    pub edges: Vec<StyledEdge>,
}

/// Computes positions and colors for the visible subset of `graph`.
pub fn layout(graph: &Graph, options: &LayoutOptions) -> LayoutResult {
    let visible = visible_ids(graph, options);

    // Reduce to a single-parent tree: the first incoming edge in insertion
    // order with a visible source wins; everything else, including orphans
    // left behind by non-cascading deletes, hangs off the virtual root.
    let mut layout_parent: BTreeMap<&str, &str> = BTreeMap::new();
    for id in &visible {
        let parent = graph
            .edges
            .iter()
            .find(|edge| edge.target == *id && visible.contains(edge.source.as_str()))
            .map(|edge| edge.source.as_str())
            .unwrap_or(VIRTUAL_ROOT_ID);
        layout_parent.insert(id.as_str(), parent);
    }

    // Children in edge insertion order; virtual-root children in id order.
    let mut children: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for edge in &graph.edges {
        if layout_parent.get(edge.target.as_str()).copied() == Some(edge.source.as_str()) {
            children
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
        }
    }
    for id in &visible {
        if layout_parent.get(id.as_str()).copied() == Some(VIRTUAL_ROOT_ID) {
            children.entry(VIRTUAL_ROOT_ID).or_default().push(id.as_str());
        }
    }

    let mut positions: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    let mut next_leaf = 0usize;
    place_subtree(
        VIRTUAL_ROOT_ID,
        0,
        &children,
        &mut positions,
        &mut next_leaf,
    );

    let mut nodes = Vec::with_capacity(visible.len() + 1);
    let (root_x, root_y) = positions[VIRTUAL_ROOT_ID];
    nodes.push(PositionedNode {
        id: VIRTUAL_ROOT_ID.to_string(),
        label: options.viewer_label.clone(),
        kind: NodeKind::Root,
        x: root_x,
        y: root_y,
        // The viewer anchor is pinned to the first palette entry, not hashed.
        color: PALETTE[0].to_string(),
        selected: false,
    });

    let mut edges = Vec::with_capacity(visible.len());
    for id in &visible {
        let node = match graph.node(id) {
            Some(node) => node,
            None => continue,
        };
        let parent = layout_parent[id.as_str()];
        // A node inside a malformed parent cycle never gets placed; leave it
        // out rather than panic.
        let (x, y) = match positions.get(id.as_str()) {
            Some(&position) => position,
            None => continue,
        };
        nodes.push(positioned(node, parent, x, y, options));
        edges.push(StyledEdge {
            id: format!("e-{parent}-{id}"),
            source: parent.to_string(),
            target: id.clone(),
            style: "smoothstep",
        });
    }

    LayoutResult { nodes, edges }
}

fn positioned(
    node: &Node,
    parent: &str,
    x: f64,
    y: f64,
    options: &LayoutOptions,
) -> PositionedNode {
    let layout_parent = (parent != VIRTUAL_ROOT_ID).then_some(parent);
    PositionedNode {
        id: node.id.clone(),
        label: node.label.clone(),
        kind: node.kind,
        x,
        y,
        color: node_color(
            &node.id,
            layout_parent,
            node.kind,
            node.color_override.as_deref(),
        ),
        selected: options.selected_ids.contains(&node.id),
    }
}

/// Tidy placement: leaves advance a shared horizontal cursor, parents center
/// over their children, depth maps to the vertical axis. The shared cursor
/// keeps sibling subtrees from overlapping.
fn place_subtree<'a>(
    id: &'a str,
    depth: usize,
    children: &BTreeMap<&'a str, Vec<&'a str>>,
    positions: &mut BTreeMap<&'a str, (f64, f64)>,
    next_leaf: &mut usize,
) -> f64 {
    let y = depth as f64 * LEVEL_SPACING;
    let kids: &[&str] = children.get(id).map(Vec::as_slice).unwrap_or(&[]);

    let x = if kids.is_empty() {
        let x = *next_leaf as f64 * SIBLING_SPACING;
        *next_leaf += 1;
        x
    } else {
        let first = place_subtree(kids[0], depth + 1, children, positions, next_leaf);
        let mut last = first;
        for kid in &kids[1..] {
            last = place_subtree(kid, depth + 1, children, positions, next_leaf);
        }
        (first + last) / 2.0
    };

    positions.insert(id, (x, y));
    x
}

/// Applies the visibility filter of the current mode.
fn visible_ids(graph: &Graph, options: &LayoutOptions) -> BTreeSet<NodeId> {
    match options.mode {
        ViewMode::Global => graph.nodes.keys().cloned().collect(),
        ViewMode::Personal => {
            // Parent-chasing BFS from each selected id back toward the roots:
            // the union of ancestor chains is exactly the set of nodes lying
            // on some root-to-selected path.
            let mut visible: BTreeSet<NodeId> = BTreeSet::new();
            for selected in &options.selected_ids {
                if !graph.contains(selected) {
                    continue;
                }
                let mut queue = vec![selected.clone()];
                while let Some(current) = queue.pop() {
                    if !visible.insert(current.clone()) {
                        continue;
                    }
                    for parent in graph.parents_of(&current) {
                        queue.push(parent.clone());
                    }
                }
            }
            visible
        }
    }
}
