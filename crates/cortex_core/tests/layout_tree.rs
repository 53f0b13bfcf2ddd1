use cortex_core::{
    color_by_hash, delete_node, layout, merge_path, Graph, LayoutOptions, Node, NodeKind,
    PathStep, ViewMode, PALETTE, VIRTUAL_ROOT_ID,
};
use std::collections::BTreeSet;

fn sample_graph() -> Graph {
    let graph = merge_path(
        &Graph::new(),
        &[
            PathStep::category("Music"),
            PathStep::category("Rock"),
            PathStep::entity("Pink Floyd"),
        ],
    )
    .unwrap();
    let graph = merge_path(
        &graph,
        &[
            PathStep::category("Music"),
            PathStep::category("Jazz"),
            PathStep::entity("Miles Davis"),
        ],
    )
    .unwrap();
    merge_path(
        &graph,
        &[PathStep::category("Sports"), PathStep::entity("Formula 1")],
    )
    .unwrap()
}

fn personal(selected: &[&str]) -> LayoutOptions {
    LayoutOptions {
        mode: ViewMode::Personal,
        selected_ids: selected.iter().map(|s| s.to_string()).collect(),
        ..LayoutOptions::default()
    }
}

#[test]
fn layout_is_deterministic() {
    let graph = sample_graph();
    let options = LayoutOptions::default();
    let first = layout(&graph, &options);
    let second = layout(&graph, &options);
    assert_eq!(first, second);
}

#[test]
fn global_mode_positions_every_node_plus_virtual_root() {
    let graph = sample_graph();
    let result = layout(&graph, &LayoutOptions::default());
    assert_eq!(result.nodes.len(), graph.nodes.len() + 1);
    // One edge per real node, from its layout-parent.
    assert_eq!(result.edges.len(), graph.nodes.len());
    assert_eq!(result.nodes[0].id, VIRTUAL_ROOT_ID);
}

#[test]
fn virtual_root_is_pinned_to_the_first_palette_entry() {
    let result = layout(&sample_graph(), &LayoutOptions::default());
    assert_eq!(result.nodes[0].color, PALETTE[0]);
    assert_eq!(result.nodes[0].color, "#facc15");
}

#[test]
fn personal_mode_shows_exactly_the_selected_path() {
    let graph = sample_graph();
    let result = layout(&graph, &personal(&["pink-floyd"]));

    let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["music", "pink-floyd", "rock", VIRTUAL_ROOT_ID]);
}

#[test]
fn depth_maps_to_vertical_spacing() {
    let graph = sample_graph();
    let result = layout(&graph, &personal(&["pink-floyd"]));
    let y_of = |id: &str| {
        result
            .nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.y)
            .unwrap()
    };
    assert_eq!(y_of(VIRTUAL_ROOT_ID), 0.0);
    assert_eq!(y_of("music"), 250.0);
    assert_eq!(y_of("rock"), 500.0);
    assert_eq!(y_of("pink-floyd"), 750.0);
}

#[test]
fn siblings_do_not_overlap_and_share_color() {
    let graph = sample_graph();
    let result = layout(&graph, &LayoutOptions::default());

    let node = |id: &str| result.nodes.iter().find(|n| n.id == id).unwrap();
    let rock = node("rock");
    let jazz = node("jazz");
    assert_ne!((rock.x, rock.y), (jazz.x, jazz.y));
    assert_eq!(rock.y, jazz.y);
    // Siblings hash their shared layout-parent.
    assert_eq!(rock.color, jazz.color);
    assert_eq!(rock.color, color_by_hash("music"));
}

#[test]
fn orphans_attach_to_virtual_root() {
    let graph = sample_graph();
    // Dropping Music without cascade orphans Rock and Jazz.
    let edited = delete_node(&graph, "music", false);
    let result = layout(&edited, &LayoutOptions::default());

    let rock_edge = result.edges.iter().find(|e| e.target == "rock").unwrap();
    assert_eq!(rock_edge.source, VIRTUAL_ROOT_ID);
    assert_eq!(rock_edge.id, format!("e-{VIRTUAL_ROOT_ID}-rock"));
}

#[test]
fn first_incoming_edge_wins_as_layout_parent() {
    // chess has two parents; strategy's edge was inserted first.
    let graph = merge_path(
        &Graph::new(),
        &[PathStep::category("Strategy"), PathStep::entity("Chess")],
    )
    .unwrap();
    let graph = merge_path(
        &graph,
        &[PathStep::category("Board Games"), PathStep::entity("Chess")],
    )
    .unwrap();

    let result = layout(&graph, &LayoutOptions::default());
    let chess_edges: Vec<_> = result.edges.iter().filter(|e| e.target == "chess").collect();
    assert_eq!(chess_edges.len(), 1);
    assert_eq!(chess_edges[0].source, "strategy");
}

#[test]
fn color_override_survives_layout() {
    let mut graph = sample_graph();
    if let Some(node) = graph.nodes.get_mut("rock") {
        node.color_override = Some("#000000".to_string());
    }
    let result = layout(&graph, &LayoutOptions::default());
    let rock = result.nodes.iter().find(|n| n.id == "rock").unwrap();
    assert_eq!(rock.color, "#000000");
}

#[test]
fn selected_flag_is_reported() {
    let graph = sample_graph();
    let mut options = LayoutOptions::default();
    options.selected_ids = BTreeSet::from(["jazz".to_string()]);
    let result = layout(&graph, &options);
    assert!(result.nodes.iter().find(|n| n.id == "jazz").unwrap().selected);
    assert!(!result.nodes.iter().find(|n| n.id == "rock").unwrap().selected);
}

#[test]
fn empty_graph_still_yields_the_viewer_anchor() {
    let result = layout(&Graph::new(), &LayoutOptions::default());
    assert_eq!(result.nodes.len(), 1);
    assert!(result.edges.is_empty());
    let viewer = &result.nodes[0];
    assert_eq!(viewer.label, "You");
    assert_eq!(viewer.kind, NodeKind::Root);
}

#[test]
fn personal_mode_with_missing_selection_is_empty() {
    let graph = sample_graph();
    let mut with_ghost = personal(&["not-there"]);
    with_ghost.selected_ids.insert("ghost".to_string());
    let result = layout(&graph, &with_ghost);
    assert_eq!(result.nodes.len(), 1); // just the viewer
}

#[test]
fn virtual_root_id_cannot_collide_with_canonical_ids() {
    // Canonical ids never contain ':'.
    let node = Node::new(
        cortex_core::canonicalize("viewer:root"),
        "viewer:root",
        NodeKind::Category,
    );
    assert_ne!(node.id, VIRTUAL_ROOT_ID);
}
