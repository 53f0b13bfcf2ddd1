//! Use-case services above the engines.
//!
//! # Responsibility
//! - Own the evolving graph snapshot and serialize mutating operations.

pub mod graph_service;
