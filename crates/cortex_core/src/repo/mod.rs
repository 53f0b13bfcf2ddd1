//! Persistence layer for the local selection store.
//!
//! # Responsibility
//! - Provide the generic key -> JSON-string contract and its SQLite backing.
//! - Provide typed access to selections and user-added custom nodes on top.

pub mod kv_repo;
pub mod selection_store;
