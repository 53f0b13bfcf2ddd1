//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to exercise `cortex_core` end to end:
//!   seed the demo roots, merge a sample path, print the layout.
//! - Keep output deterministic for quick local sanity checks.

use cortex_core::{
    demo_graph, layout, merge_path, LayoutOptions, PathStep, ViewMode,
};

fn main() {
    println!("cortex_core version={}", cortex_core::core_version());

    let graph = demo_graph();
    let path = vec![
        PathStep::category("Music"),
        PathStep::category("Rock"),
        PathStep::entity("Pink Floyd"),
    ];

    let merged = match merge_path(&graph, &path) {
        Ok(merged) => merged,
        Err(err) => {
            eprintln!("merge failed: {err}");
            std::process::exit(1);
        }
    };
    println!(
        "merged: nodes={} edges={}",
        merged.nodes.len(),
        merged.edges.len()
    );

    let options = LayoutOptions {
        mode: ViewMode::Global,
        ..LayoutOptions::default()
    };
    let result = layout(&merged, &options);
    for node in &result.nodes {
        println!(
            "{:<14} ({:>6.1}, {:>6.1}) {} {}",
            node.id, node.x, node.y, node.color, node.label
        );
    }
}
