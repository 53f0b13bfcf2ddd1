//! Core domain logic for Cortex, an incrementally grown interest graph.
//! This crate is the single source of truth for graph invariants.
//!
//! The graph is a labeled multi-parent DAG of interest categories and
//! entities. Paths produced by an external text-generation step are merged in
//! without duplicating concepts, and a derived tidy-tree layout turns the
//! result into positioned, colored render elements.

pub mod canon;
pub mod color;
pub mod db;
pub mod edit;
pub mod generate;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod model;
pub mod repo;
pub mod service;

pub use canon::{canonicalize, is_same_node, FUZZY_DISTANCE_MAX};
pub use color::{adjust_brightness, color_by_hash, node_color, PALETTE};
pub use edit::{delete_node, update_node_color};
pub use generate::{
    build_prompt, parse_generated_path, GenerateError, GenerationContext, NodeOutline,
    PathGenerator,
};
pub use layout::{
    layout, LayoutOptions, LayoutResult, PositionedNode, StyledEdge, ViewMode, VIRTUAL_ROOT_ID,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use merge::{merge_path, MergeError};
pub use model::graph::{Edge, Graph, Node, NodeId, NodeKind, Position};
pub use model::path::{GeneratedPath, PathStep, StepKind};
pub use repo::kv_repo::{KvError, KvResult, KvStore, SqliteKvStore};
pub use repo::selection_store::{CustomNodeRecord, SelectionStore, StoreError, StoreResult};
pub use service::graph_service::{GenerationTicket, GraphService, MergeReport, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Seeds the demo snapshot: three empty root categories.
pub fn demo_graph() -> Graph {
    let mut graph = Graph::new();
    for (id, label) in [("music", "Music"), ("sports", "Sports"), ("movies", "Movies")] {
        graph.add_node(Node::new(id, label, NodeKind::Root));
    }
    graph
}
