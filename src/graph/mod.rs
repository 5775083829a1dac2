use crate::error::GraphError;
use crate::model::{Edge, EdgeKind, Node, Position};
use ahash::AHashSet;
use tracing::{debug, warn};

mod connectivity;
mod derived;
mod patch;
mod reconcile;
mod validator;

pub use connectivity::{Connectivity, compute_connectivity};
pub use derived::derive_edges;
pub use patch::*;
pub use reconcile::ReconcileReport;
pub use validator::validate_connection;

use reconcile::reconcile;

/// Owns the canonical nodes and explicit edges of one canvas.
///
/// Every mutation keeps references consistent (see [`ReconcileReport`]) and refreshes the
/// cached derived edges and connectivity before returning. A failed mutation leaves the
/// store exactly as it was.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    persona_ids: Option<AHashSet<String>>,
    derived: Vec<Edge>,
    connectivity: Connectivity,
    revision: u64,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn explicit_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Fallback and conditional edges computed from the current node data.
    pub fn derived_edges(&self) -> &[Edge] {
        &self.derived
    }

    /// Explicit edges followed by derived edges.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().chain(self.derived.iter())
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    /// Bumped by every change to nodes or edges. Selection changes do not count.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Looks an edge up among explicit and derived edges.
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.all_edges().find(|e| e.id == id)
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.selected)
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.contains_node(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        debug!(node = %node.id, kind = %node.kind(), "adding node");
        self.nodes.push(node);
        self.reconcile_and_refresh();
        Ok(())
    }

    /// Removes a node, every explicit edge touching it and every reference to it elsewhere.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let removed = self.nodes.remove(index);

        let before = self.edges.len();
        self.edges.retain(|e| !e.touches(id));
        debug!(
            node = %id,
            edges_removed = before - self.edges.len(),
            "removed node"
        );

        self.reconcile_and_refresh();
        Ok(removed)
    }

    /// Applies a property edit. The patch must match the node's kind, and any rules it
    /// installs must use an operator allowed for their condition type.
    pub fn update_node_data(&mut self, id: &str, patch: NodePatch) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;

        if patch.kind() != node.kind() {
            return Err(GraphError::KindMismatch {
                node_id: id.to_string(),
                expected: patch.kind(),
                found: node.kind(),
            });
        }
        if let Some(rules) = patch.rules() {
            for rule in rules {
                rule.check_operator()
                    .map_err(|message| GraphError::InvalidRule {
                        node_id: id.to_string(),
                        rule_id: rule.id.clone(),
                        message,
                    })?;
            }
        }

        let mut data = node.data.clone();
        patch.apply(&mut data).map_err(|found| GraphError::KindMismatch {
            node_id: id.to_string(),
            expected: found,
            found,
        })?;
        node.data = data;

        self.reconcile_and_refresh();
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        node.position = position;
        self.revision += 1;
        Ok(())
    }

    /// Selects exactly the given nodes. Unknown ids are ignored.
    pub fn select_only<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let wanted: AHashSet<&str> = ids.into_iter().collect();
        for node in &mut self.nodes {
            node.selected = wanted.contains(node.id.as_str());
        }
    }

    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    pub fn add_explicit_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if edge.kind.is_derived() {
            return Err(GraphError::DerivedEdge(edge.id));
        }
        if self.edges.iter().any(|e| e.id == edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(GraphError::DanglingEndpoint {
                    edge_id: edge.id.clone(),
                    node_id: endpoint.clone(),
                });
            }
        }
        debug!(edge = %edge.id, source = %edge.source, target = %edge.target, "adding edge");
        self.edges.push(edge);
        self.refresh();
        Ok(())
    }

    /// Removes a user-drawn edge. Derived edges cannot be removed this way: they follow
    /// node data and disappear only when that data changes.
    pub fn remove_explicit_edge(&mut self, id: &str) -> Result<Edge, GraphError> {
        match self.edges.iter().position(|e| e.id == id) {
            Some(index) => {
                let removed = self.edges.remove(index);
                self.refresh();
                Ok(removed)
            }
            None if self.derived.iter().any(|e| e.id == id) => {
                Err(GraphError::DerivedEdge(id.to_string()))
            }
            None => Err(GraphError::EdgeNotFound(id.to_string())),
        }
    }

    /// Inserts a batch of nodes and explicit edges as one change, or nothing at all.
    pub fn insert_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) -> Result<(), GraphError> {
        let mut node_ids: AHashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        for node in &nodes {
            if !node_ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        let mut edge_ids: AHashSet<&str> = self.edges.iter().map(|e| e.id.as_str()).collect();
        for edge in &edges {
            if edge.kind.is_derived() {
                return Err(GraphError::DerivedEdge(edge.id.clone()));
            }
            if !edge_ids.insert(edge.id.as_str()) {
                return Err(GraphError::DuplicateEdge(edge.id.clone()));
            }
            for endpoint in [&edge.source, &edge.target] {
                if !node_ids.contains(endpoint.as_str()) {
                    return Err(GraphError::DanglingEndpoint {
                        edge_id: edge.id.clone(),
                        node_id: endpoint.clone(),
                    });
                }
            }
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "inserting batch");
        self.nodes.extend(nodes);
        self.edges.extend(edges);
        self.reconcile_and_refresh();
        Ok(())
    }

    /// Swaps in a whole new graph (undo, redo, load).
    ///
    /// Input is sanitized rather than rejected: repeated node ids keep their first
    /// occurrence, and edges that are derived, repeated or dangling are dropped.
    pub fn replace_all(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(nodes.len());
        let mut kept_nodes = Vec::with_capacity(nodes.len());
        for node in nodes {
            if seen.insert(node.id.clone()) {
                kept_nodes.push(node);
            } else {
                warn!(node = %node.id, "dropping node with repeated id");
            }
        }

        let mut edge_ids: AHashSet<String> = AHashSet::with_capacity(edges.len());
        let mut kept_edges = Vec::with_capacity(edges.len());
        for edge in edges {
            let keep = edge.kind == EdgeKind::Explicit
                && seen.contains(&edge.source)
                && seen.contains(&edge.target)
                && edge_ids.insert(edge.id.clone());
            if keep {
                kept_edges.push(edge);
            } else {
                debug!(edge = %edge.id, "dropping edge on replace");
            }
        }

        self.nodes = kept_nodes;
        self.edges = kept_edges;
        self.reconcile_and_refresh();
    }

    /// Records the current persona list and clears chat references to personas no longer in it.
    pub fn set_persona_ids(&mut self, ids: impl IntoIterator<Item = String>) -> ReconcileReport {
        self.persona_ids = Some(ids.into_iter().collect());
        self.reconcile_and_refresh()
    }

    fn reconcile_and_refresh(&mut self) -> ReconcileReport {
        let report = reconcile(&mut self.nodes, self.persona_ids.as_ref());
        if report.changed() {
            debug!(?report, "reconciled stale references");
        }
        self.refresh();
        report
    }

    fn refresh(&mut self) {
        self.derived = derive_edges(&self.nodes);
        self.connectivity = compute_connectivity(&self.nodes, self.all_edges());
        self.revision += 1;
    }
}
