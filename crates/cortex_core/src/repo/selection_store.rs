//! Typed selection and custom-node store over the key-value layer.
//!
//! # Responsibility
//! - Persist the set of selected node ids and user-added node records as
//!   JSON payloads under fixed keys.
//! - Replay persisted custom nodes into a base graph at load time.
//!
//! # Invariants
//! - Replay is idempotent: records already present in the graph are skipped.
//! - Replay never touches the store; it only derives a new snapshot.

use crate::model::graph::{Graph, Node, NodeId, NodeKind};
use crate::repo::kv_repo::{KvError, KvStore};
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SELECTED_IDS_KEY: &str = "user_selected_ids";
const CUSTOM_NODES_KEY: &str = "user_custom_nodes";

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from typed store accessors.
#[derive(Debug)]
pub enum StoreError {
    Kv(KvError),
    /// A persisted payload does not decode as its expected JSON shape.
    InvalidPayload { key: &'static str, message: String },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::InvalidPayload { key, message } => {
                write!(f, "invalid persisted payload under `{key}`: {message}")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::InvalidPayload { .. } => None,
        }
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// One user-added node, linked to its parent by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomNodeRecord {
    pub id: NodeId,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<NodeId>,
}

/// Typed facade over the key-value store.
pub struct SelectionStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> SelectionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    /// Returns the persisted selected ids; empty when never saved.
    pub fn selected_ids(&self) -> StoreResult<Vec<NodeId>> {
        self.load_json(SELECTED_IDS_KEY)
    }

    pub fn save_selected_ids(&self, ids: &[NodeId]) -> StoreResult<()> {
        self.save_json(SELECTED_IDS_KEY, ids)
    }

    /// Returns the persisted custom-node records; empty when never saved.
    pub fn custom_nodes(&self) -> StoreResult<Vec<CustomNodeRecord>> {
        self.load_json(CUSTOM_NODES_KEY)
    }

    /// Appends one custom-node record.
    pub fn add_custom_node(&self, record: CustomNodeRecord) -> StoreResult<()> {
        let mut records = self.custom_nodes()?;
        records.push(record);
        self.save_json(CUSTOM_NODES_KEY, &records)
    }

    /// Removes a record; with `cascade` set, every record parented under it
    /// goes too. Without it the children's records survive and replay as
    /// top-level roots once their parent is gone.
    pub fn remove_custom_node(&self, node_id: &str, cascade: bool) -> StoreResult<()> {
        let mut records = self.custom_nodes()?;
        if cascade {
            let mut doomed = vec![node_id.to_string()];
            let mut index = 0;
            while index < doomed.len() {
                let current = doomed[index].clone();
                for record in &records {
                    if record.parent_id.as_deref() == Some(current.as_str())
                        && !doomed.contains(&record.id)
                    {
                        doomed.push(record.id.clone());
                    }
                }
                index += 1;
            }
            records.retain(|record| !doomed.contains(&record.id));
        } else {
            records.retain(|record| record.id != node_id);
        }
        self.save_json(CUSTOM_NODES_KEY, &records)
    }

    /// Replays persisted custom nodes into `graph` as one-step merges.
    ///
    /// Records whose id already exists are skipped; records with a parent get
    /// an idempotent edge when the parent is present, and become top-level
    /// roots otherwise.
    pub fn apply_custom_nodes(&self, graph: &Graph) -> StoreResult<Graph> {
        let records = self.custom_nodes()?;
        let mut augmented = graph.clone();
        let mut applied = 0usize;

        for record in records {
            let parent = record
                .parent_id
                .as_deref()
                .filter(|parent| augmented.contains(parent));
            if !augmented.contains(&record.id) {
                let kind = if parent.is_some() {
                    NodeKind::Category
                } else {
                    NodeKind::Root
                };
                augmented.add_node(Node::new(record.id.clone(), record.label.clone(), kind));
                applied += 1;
            }
            if let Some(parent) = parent {
                augmented.insert_edge(parent, &record.id);
            }
        }

        info!("event=apply_custom_nodes module=store status=ok applied={applied}");
        Ok(augmented)
    }

    fn load_json<T: for<'de> Deserialize<'de> + Default>(
        &self,
        key: &'static str,
    ) -> StoreResult<T> {
        match self.kv.get(key)? {
            Some(raw) => {
                serde_json::from_str(&raw).map_err(|err| StoreError::InvalidPayload {
                    key,
                    message: err.to_string(),
                })
            }
            None => Ok(T::default()),
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> StoreResult<()> {
        let raw = serde_json::to_string(value).map_err(|err| StoreError::InvalidPayload {
            key,
            message: err.to_string(),
        })?;
        self.kv.put(key, &raw)?;
        Ok(())
    }
}
