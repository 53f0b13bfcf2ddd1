//! Domain model for the interest graph.
//!
//! # Responsibility
//! - Define the canonical graph snapshot shape shared by all engines.
//! - Define the externally supplied path schema consumed by the merge engine.
//!
//! # Invariants
//! - Node ids are unique within a snapshot.
//! - At most one edge exists per ordered `(source, target)` pair.

pub mod graph;
pub mod path;
