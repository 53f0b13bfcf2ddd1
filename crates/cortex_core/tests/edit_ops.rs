use cortex_core::{delete_node, merge_path, update_node_color, Graph, PathStep};

fn family() -> Graph {
    // root -> a -> {b, c}
    let graph = merge_path(
        &Graph::new(),
        &[
            PathStep::category("Root Topic"),
            PathStep::category("A"),
            PathStep::entity("B"),
        ],
    )
    .unwrap();
    merge_path(
        &graph,
        &[
            PathStep::category("Root Topic"),
            PathStep::category("A"),
            PathStep::entity("Clay"),
        ],
    )
    .unwrap()
}

#[test]
fn cascade_delete_removes_whole_subtree() {
    let graph = family();
    let edited = delete_node(&graph, "a", true);

    assert!(!edited.contains("a"));
    assert!(!edited.contains("b"));
    assert!(!edited.contains("clay"));
    assert!(edited.contains("root-topic"));
    assert!(edited.edges.is_empty());
}

#[test]
fn plain_delete_keeps_children_as_orphans() {
    let graph = family();
    let edited = delete_node(&graph, "a", false);

    assert!(!edited.contains("a"));
    assert!(edited.contains("b"));
    assert!(edited.contains("clay"));
    // Every edge touched "a", so none survive.
    assert!(edited.edges.is_empty());
}

#[test]
fn delete_is_pure() {
    let graph = family();
    let before = graph.clone();
    delete_node(&graph, "a", true);
    assert_eq!(graph, before);
}

#[test]
fn cascade_removes_descendants_even_with_outside_parents() {
    // shared is a child of both "a" and "keep"; deleting "a" with cascade
    // still removes shared, because the descendant set is computed from the
    // deleted node alone (whole-graph BFS over outgoing edges).
    let graph = merge_path(
        &Graph::new(),
        &[PathStep::category("A"), PathStep::entity("Shared")],
    )
    .unwrap();
    let graph = merge_path(
        &graph,
        &[PathStep::category("Keep"), PathStep::entity("Shared")],
    )
    .unwrap();

    let edited = delete_node(&graph, "a", true);
    assert!(!edited.contains("shared"));
    assert!(edited.contains("keep"));
    assert!(edited.edges.is_empty());
}

#[test]
fn recolor_and_delete_missing_ids_are_no_ops() {
    let graph = family();
    assert_eq!(delete_node(&graph, "nope", true), graph);
    assert_eq!(delete_node(&graph, "nope", false), graph);
    assert_eq!(update_node_color(&graph, "nope", "#fff"), graph);
}

#[test]
fn recolor_sets_only_the_override() {
    let graph = family();
    let edited = update_node_color(&graph, "b", "#22d3ee");
    let node = edited.node("b").unwrap();
    assert_eq!(node.color_override.as_deref(), Some("#22d3ee"));
    assert_eq!(node.label, graph.node("b").unwrap().label);
}
