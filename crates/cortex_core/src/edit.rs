//! Direct graph edit operations.
//!
//! # Responsibility
//! - Node deletion (cascading and non-cascading) and color override.
//!
//! # Invariants
//! - Pure and total: missing ids return an unchanged clone, never an error.
//! - No edge survives with a removed endpoint.

use crate::model::graph::Graph;
use log::info;
use std::collections::BTreeSet;

/// Removes a node, and with `cascade` its whole reachable descendant set.
///
/// Without cascade, children that lose their only parent stay in the graph as
/// orphans; the layout engine reattaches them to the virtual root. With
/// cascade, descendants are collected by BFS over outgoing edges across the
/// entire graph, so a node reachable through several ancestors inside the
/// subtree is still removed exactly once.
pub fn delete_node(graph: &Graph, node_id: &str, cascade: bool) -> Graph {
    if !graph.contains(node_id) {
        return graph.clone();
    }

    let mut doomed: BTreeSet<String> = BTreeSet::new();
    doomed.insert(node_id.to_string());

    if cascade {
        let mut queue = vec![node_id.to_string()];
        while let Some(current) = queue.pop() {
            for child in graph.children_of(&current) {
                if doomed.insert(child.clone()) {
                    queue.push(child.clone());
                }
            }
        }
    }

    let mut edited = graph.clone();
    edited.nodes.retain(|id, _| !doomed.contains(id));
    edited
        .edges
        .retain(|edge| !doomed.contains(&edge.source) && !doomed.contains(&edge.target));

    info!(
        "event=delete_node module=edit status=ok node_id={node_id} cascade={cascade} removed={}",
        doomed.len()
    );
    edited
}

/// Sets the explicit color override of a node. No-op when the id is missing.
pub fn update_node_color(graph: &Graph, node_id: &str, color: &str) -> Graph {
    let mut edited = graph.clone();
    if let Some(node) = edited.nodes.get_mut(node_id) {
        node.color_override = Some(color.to_string());
        info!("event=update_node_color module=edit status=ok node_id={node_id} color={color}");
    }
    edited
}
