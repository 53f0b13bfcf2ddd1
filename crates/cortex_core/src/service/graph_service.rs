//! Graph snapshot owner and merge-request serializer.
//!
//! # Responsibility
//! - Hold the single authoritative graph snapshot and its revision counter.
//! - Serialize generation-backed merges behind a single in-flight guard.
//! - Route edit and layout requests to the pure engines.
//! - Write custom-node records and the selection set through to the store.
//!
//! # Invariants
//! - Snapshots are replaced wholesale, never mutated in place.
//! - At most one generation request is outstanding at any time; a second
//!   request is rejected as busy, not queued silently.
//! - A failed or abandoned generation leaves snapshot and revision untouched.
//! - Store writes happen before the in-memory snapshot changes; a failed
//!   write leaves the snapshot as it was.

use crate::edit::{delete_node, update_node_color};
use crate::generate::{GenerateError, GenerationContext, PathGenerator};
use crate::layout::{layout, LayoutOptions, LayoutResult, ViewMode};
use crate::merge::{merge_path, MergeError};
use crate::model::graph::{Graph, Node, NodeId, NodeKind};
use crate::model::path::GeneratedPath;
use crate::repo::kv_repo::KvStore;
use crate::repo::selection_store::{CustomNodeRecord, SelectionStore, StoreError};
use log::{error, info, warn};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Errors surfaced by the service layer.
#[derive(Debug)]
pub enum ServiceError {
    /// A generation-backed merge is already in flight.
    Busy,
    /// Custom node name is blank after trimming.
    BlankNodeName,
    /// Custom node parent id does not exist.
    ParentNotFound(NodeId),
    Generate(GenerateError),
    Merge(MergeError),
    /// Persistence failure in the selection store.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Busy => write!(f, "a merge request is already in flight"),
            Self::BlankNodeName => write!(f, "node name must not be blank"),
            Self::ParentNotFound(id) => write!(f, "parent node not found: {id}"),
            Self::Generate(err) => write!(f, "{err}"),
            Self::Merge(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generate(err) => Some(err),
            Self::Merge(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<GenerateError> for ServiceError {
    fn from(value: GenerateError) -> Self {
        Self::Generate(value)
    }
}

impl From<MergeError> for ServiceError {
    fn from(value: MergeError) -> Self {
        Self::Merge(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Token for one outstanding generation request.
///
/// The external call is a suspension point; the ticket pins the query and the
/// context captured when the request started, and must be handed back through
/// [`GraphService::complete_generation`] or
/// [`GraphService::abandon_generation`].
#[derive(Debug)]
pub struct GenerationTicket {
    pub query: String,
    pub context: GenerationContext,
    started_at: Instant,
}

/// Summary of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub disambiguation: String,
    pub nodes_added: usize,
    pub edges_added: usize,
}

/// Single owner of the evolving interest graph.
///
/// Holds the generator boundary and the selection store; user-added nodes and
/// selection changes are persisted as they happen, while the graph itself
/// stays in memory and is reseeded per session.
pub struct GraphService<G: PathGenerator, S: KvStore> {
    generator: G,
    store: SelectionStore<S>,
    graph: Graph,
    selected_ids: BTreeSet<NodeId>,
    revision: u64,
    generation_in_flight: bool,
}

impl<G: PathGenerator, S: KvStore> GraphService<G, S> {
    pub fn new(generator: G, initial: Graph, store: SelectionStore<S>) -> Self {
        Self {
            generator,
            store,
            graph: initial,
            selected_ids: BTreeSet::new(),
            revision: 0,
            generation_in_flight: false,
        }
    }

    /// Builds a service from persisted state: replays custom-node records
    /// into `base` and restores the selection, dropping ids that no longer
    /// resolve to a node.
    pub fn load(
        generator: G,
        base: Graph,
        store: SelectionStore<S>,
    ) -> Result<Self, ServiceError> {
        let graph = store.apply_custom_nodes(&base)?;
        let selected_ids: BTreeSet<NodeId> = store
            .selected_ids()?
            .into_iter()
            .filter(|id| graph.contains(id))
            .collect();
        info!(
            "event=service_load module=service status=ok nodes={} selected={}",
            graph.nodes.len(),
            selected_ids.len()
        );
        Ok(Self {
            generator,
            store,
            graph,
            selected_ids,
            revision: 0,
            generation_in_flight: false,
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Bumped every time the snapshot is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether a generation request is outstanding; callers surface this as a
    /// loading state.
    pub fn is_busy(&self) -> bool {
        self.generation_in_flight
    }

    /// Starts a generation-backed merge, claiming the in-flight guard.
    ///
    /// The snapshot read for context and the later write-back are not atomic
    /// across the external call, so a second overlapping request would merge
    /// against a stale snapshot and silently drop the first result. Hence
    /// reject-while-busy instead of queueing.
    pub fn begin_generation(&mut self, query: &str) -> Result<GenerationTicket, ServiceError> {
        if self.generation_in_flight {
            warn!("event=generate module=service status=rejected reason=busy");
            return Err(ServiceError::Busy);
        }
        self.generation_in_flight = true;
        info!("event=generate module=service status=start query_len={}", query.len());
        Ok(GenerationTicket {
            query: query.to_string(),
            context: GenerationContext::from_graph(&self.graph),
            started_at: Instant::now(),
        })
    }

    /// Finishes an outstanding request with the provider's result.
    ///
    /// On success the validated path is merged and the snapshot replaced; on
    /// provider failure the error is surfaced and the graph stays unchanged.
    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<GeneratedPath, GenerateError>,
    ) -> Result<MergeReport, ServiceError> {
        self.generation_in_flight = false;
        let generated = match result {
            Ok(generated) => generated,
            Err(err) => {
                error!(
                    "event=generate module=service status=error duration_ms={} error={}",
                    ticket.started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let merged = merge_path(&self.graph, &generated.path)?;
        let report = MergeReport {
            disambiguation: generated.disambiguation,
            nodes_added: merged.nodes.len() - self.graph.nodes.len(),
            edges_added: merged.edges.len() - self.graph.edges.len(),
        };
        self.replace_snapshot(merged);

        info!(
            "event=generate module=service status=ok duration_ms={} nodes_added={} edges_added={}",
            ticket.started_at.elapsed().as_millis(),
            report.nodes_added,
            report.edges_added
        );
        Ok(report)
    }

    /// Discards an outstanding request, e.g. when the caller navigates away.
    /// No partial mutation has happened, so dropping the ticket is enough.
    pub fn abandon_generation(&mut self, ticket: GenerationTicket) {
        self.generation_in_flight = false;
        info!(
            "event=generate module=service status=abandoned duration_ms={}",
            ticket.started_at.elapsed().as_millis()
        );
    }

    /// Convenience driver: begin, call the provider synchronously, complete.
    pub fn merge_generated(&mut self, query: &str) -> Result<MergeReport, ServiceError> {
        let ticket = self.begin_generation(query)?;
        let result = self.generator.generate(&ticket.query, &ticket.context);
        self.complete_generation(ticket, result)
    }

    /// Adds a user-created node under an optional parent.
    ///
    /// The node gets a generated unique token id, so it can never fuzzy-merge
    /// away a later canonical node; functionally this is a one-step merge.
    /// The record is persisted before the snapshot is replaced, so a store
    /// failure leaves the graph unchanged.
    pub fn add_custom_node(
        &mut self,
        name: &str,
        parent_id: Option<&str>,
    ) -> Result<NodeId, ServiceError> {
        let label = name.trim();
        if label.is_empty() {
            return Err(ServiceError::BlankNodeName);
        }
        if let Some(parent) = parent_id {
            if !self.graph.contains(parent) {
                return Err(ServiceError::ParentNotFound(parent.to_string()));
            }
        }

        let id = format!("custom-{}", Uuid::new_v4());
        let kind = if parent_id.is_some() {
            NodeKind::Category
        } else {
            NodeKind::Root
        };

        self.store.add_custom_node(CustomNodeRecord {
            id: id.clone(),
            label: label.to_string(),
            parent_id: parent_id.map(str::to_string),
        })?;

        let mut next = self.graph.clone();
        next.add_node(Node::new(id.clone(), label, kind));
        if let Some(parent) = parent_id {
            next.insert_edge(parent, &id);
        }
        self.replace_snapshot(next);

        info!("event=add_custom_node module=service status=ok node_id={id}");
        Ok(id)
    }

    /// Deletes a node; missing ids are a silent no-op.
    ///
    /// Custom-node records follow the graph: a cascading delete drops the
    /// whole record subtree, a plain delete drops only the target's record so
    /// orphaned children replay as top-level roots next session.
    pub fn delete(&mut self, node_id: &str, cascade: bool) -> Result<(), ServiceError> {
        let next = delete_node(&self.graph, node_id, cascade);
        self.store.remove_custom_node(node_id, cascade)?;
        self.selected_ids.retain(|id| next.contains(id));
        self.persist_selection()?;
        self.replace_snapshot(next);
        Ok(())
    }

    /// Overrides a node color; missing ids are a silent no-op.
    pub fn recolor(&mut self, node_id: &str, color: &str) {
        let next = update_node_color(&self.graph, node_id, color);
        self.replace_snapshot(next);
    }

    pub fn select(&mut self, node_id: &str) -> Result<(), ServiceError> {
        if self.graph.contains(node_id) && self.selected_ids.insert(node_id.to_string()) {
            self.persist_selection()?;
        }
        Ok(())
    }

    pub fn deselect(&mut self, node_id: &str) -> Result<(), ServiceError> {
        if self.selected_ids.remove(node_id) {
            self.persist_selection()?;
        }
        Ok(())
    }

    pub fn selected_ids(&self) -> &BTreeSet<NodeId> {
        &self.selected_ids
    }

    pub fn set_selected_ids(
        &mut self,
        ids: impl IntoIterator<Item = NodeId>,
    ) -> Result<(), ServiceError> {
        self.selected_ids = ids
            .into_iter()
            .filter(|id| self.graph.contains(id))
            .collect();
        self.persist_selection()
    }

    /// Lays out the current snapshot under the given view mode.
    pub fn layout(&self, mode: ViewMode) -> LayoutResult {
        let options = LayoutOptions {
            mode,
            selected_ids: self.selected_ids.clone(),
            ..LayoutOptions::default()
        };
        layout(&self.graph, &options)
    }

    fn persist_selection(&self) -> Result<(), ServiceError> {
        let ids: Vec<NodeId> = self.selected_ids.iter().cloned().collect();
        self.store.save_selected_ids(&ids)?;
        Ok(())
    }

    fn replace_snapshot(&mut self, next: Graph) {
        self.graph = next;
        self.revision += 1;
    }
}
