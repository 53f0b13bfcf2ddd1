use cortex_core::{demo_graph, merge_path, Graph, MergeError, Node, NodeKind, PathStep};

fn music_rock_pink_floyd() -> Vec<PathStep> {
    vec![
        PathStep::category("Music"),
        PathStep::category("Rock"),
        PathStep::entity("Pink Floyd"),
    ]
}

#[test]
fn end_to_end_demo_scenario() {
    // Empty graph with three roots; merging Music -> Rock -> Pink Floyd adds
    // two nodes and two edges, leaving the other roots untouched.
    let graph = demo_graph();
    let merged = merge_path(&graph, &music_rock_pink_floyd()).unwrap();

    assert_eq!(merged.nodes.len(), 5);
    assert_eq!(merged.edges.len(), 2);
    assert!(merged.has_edge("music", "rock"));
    assert!(merged.has_edge("rock", "pink-floyd"));
    assert!(merged.contains("sports"));
    assert!(merged.contains("movies"));

    // A second path under the same branch reuses Music and Rock.
    let path = vec![
        PathStep::category("Music"),
        PathStep::category("Rock"),
        PathStep::entity("Led Zeppelin"),
    ];
    let merged_again = merge_path(&merged, &path).unwrap();
    assert_eq!(merged_again.nodes.len(), 6);
    assert_eq!(merged_again.edges.len(), 3);
    assert!(merged_again.has_edge("rock", "led-zeppelin"));
}

#[test]
fn merging_twice_is_idempotent() {
    let once = merge_path(&demo_graph(), &music_rock_pink_floyd()).unwrap();
    let twice = merge_path(&once, &music_rock_pink_floyd()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn merge_does_not_mutate_input() {
    let graph = demo_graph();
    let before = graph.clone();
    merge_path(&graph, &music_rock_pink_floyd()).unwrap();
    assert_eq!(graph, before);
}

#[test]
fn cross_link_reuses_node_and_adds_one_edge() {
    // A -> B -> X, then C -> X: X is reused under its canonical id and only
    // the C -> X edge is new.
    let first = vec![
        PathStep::category("Games"),
        PathStep::category("Strategy"),
        PathStep::entity("Chess"),
    ];
    let second = vec![PathStep::category("Board Games"), PathStep::entity("Chess")];

    let graph = merge_path(&Graph::new(), &first).unwrap();
    let merged = merge_path(&graph, &second).unwrap();

    assert_eq!(merged.nodes.len(), 4);
    assert_eq!(merged.edges.len(), 3);
    assert!(merged.has_edge("strategy", "chess"));
    assert!(merged.has_edge("board-games", "chess"));
    // Original branch intact.
    assert!(merged.has_edge("games", "strategy"));
}

#[test]
fn fuzzy_variant_traverses_instead_of_duplicating() {
    let first = vec![PathStep::category("Movies"), PathStep::category("Sci-Fi")];
    let second = vec![PathStep::category("Movies"), PathStep::category("Scifi")];

    let graph = merge_path(&Graph::new(), &first).unwrap();
    let merged = merge_path(&graph, &second).unwrap();

    assert_eq!(merged.nodes.len(), 2);
    assert!(merged.contains("sci-fi"));
    assert!(!merged.contains("scifi"));
}

#[test]
fn short_labels_past_threshold_create_distinct_nodes() {
    let graph = merge_path(
        &Graph::new(),
        &[PathStep::category("Pets"), PathStep::entity("Cat")],
    )
    .unwrap();
    let merged = merge_path(
        &graph,
        &[PathStep::category("Pets"), PathStep::entity("Dog")],
    )
    .unwrap();

    assert!(merged.contains("cat"));
    assert!(merged.contains("dog"));
    assert_eq!(merged.children_of("pets").len(), 2);
}

#[test]
fn cross_link_reuse_keeps_label_and_attributes() {
    let mut step = PathStep::entity("Chess");
    step.attributes
        .insert("players".to_string(), serde_json::json!(2));
    let graph = merge_path(
        &Graph::new(),
        &[PathStep::category("Games"), step],
    )
    .unwrap();

    // Reaching the same entity from another parent with different attributes
    // must not overwrite the stored node.
    let mut conflicting = PathStep::entity("Chess");
    conflicting
        .attributes
        .insert("players".to_string(), serde_json::json!(4));
    let merged = merge_path(
        &graph,
        &[PathStep::category("Board Games"), conflicting],
    )
    .unwrap();

    let chess = merged.node("chess").unwrap();
    assert_eq!(chess.attributes["players"], serde_json::json!(2));
    assert_eq!(chess.label, "Chess");
}

#[test]
fn blank_step_rejected_without_mutation() {
    let graph = demo_graph();
    let path = vec![PathStep::category("Music"), PathStep::entity("  ")];
    let err = merge_path(&graph, &path).unwrap_err();
    assert_eq!(err, MergeError::BlankStepName { index: 1 });
}

#[test]
fn empty_path_rejected() {
    assert_eq!(
        merge_path(&demo_graph(), &[]).unwrap_err(),
        MergeError::EmptyPath
    );
}

#[test]
fn entity_at_top_level_stays_entity() {
    let merged = merge_path(&Graph::new(), &[PathStep::entity("Banksy")]).unwrap();
    assert_eq!(merged.node("banksy").unwrap().kind, NodeKind::Entity);
}

#[test]
fn cross_link_into_ancestor_chain_does_not_create_cycle() {
    let mut graph = Graph::new();
    graph.add_node(Node::new("music", "Music", NodeKind::Root));
    graph.add_node(Node::new("rock", "Rock", NodeKind::Category));
    graph.insert_edge("music", "rock");

    // Reaching "Music" below "Rock" would close a cycle; the node is reused
    // but the edge is skipped.
    let merged = merge_path(
        &graph,
        &[PathStep::category("Rock"), PathStep::category("Music")],
    )
    .unwrap();

    assert_eq!(merged.edges.len(), 1);
    assert!(!merged.has_edge("rock", "music"));
    assert!(merged.children_of("rock").is_empty());
}
