use crate::model::{Edge, EdgeKind, Node, NodeData, Position};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What happens to fallback, rule and choice references inside pasted node data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PasteReferencePolicy {
    /// References keep pointing at the original node ids.
    #[default]
    Preserve,
    /// References to nodes that were copied along are rewritten to the pasted copies.
    RemapInternal,
}

/// A copied sub-graph: the selected nodes and the explicit edges fully inside the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipboardPayload {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The result of one paste, ready to be inserted into the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PastedFragment {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    /// Original node id to pasted node id.
    pub id_map: AHashMap<String, String>,
}

/// Captures the selection verbatim along with the explicit edges whose endpoints are both
/// selected. Edges crossing the selection boundary are left out.
pub fn capture<'a>(
    selected: impl IntoIterator<Item = &'a Node>,
    explicit_edges: &[Edge],
) -> ClipboardPayload {
    let nodes: Vec<Node> = selected.into_iter().cloned().collect();
    let ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = explicit_edges
        .iter()
        .filter(|e| e.kind == EdgeKind::Explicit)
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .cloned()
        .collect();
    ClipboardPayload { nodes, edges }
}

/// Produces a copy of `payload` with fresh ids, shifted by `offset`, all nodes selected.
///
/// `is_taken` reports ids already used by the target graph; generated ids avoid them.
pub fn duplicate(
    payload: &ClipboardPayload,
    offset: Position,
    policy: PasteReferencePolicy,
    is_taken: impl Fn(&str) -> bool,
) -> PastedFragment {
    let mut issued: AHashSet<String> = AHashSet::new();
    let mut id_map = AHashMap::with_capacity(payload.nodes.len());

    let mut nodes: Vec<Node> = payload
        .nodes
        .iter()
        .map(|original| {
            let id = fresh_id(original.kind().type_name(), &is_taken, &mut issued);
            id_map.insert(original.id.clone(), id.clone());
            Node {
                id,
                position: original.position.offset(offset),
                selected: true,
                data: original.data.clone(),
            }
        })
        .collect();

    if policy == PasteReferencePolicy::RemapInternal {
        for node in &mut nodes {
            remap_references(&mut node.data, &id_map);
        }
    }

    let edges = payload
        .edges
        .iter()
        .filter_map(|edge| {
            let source = id_map.get(&edge.source)?;
            let target = id_map.get(&edge.target)?;
            Some(Edge {
                id: fresh_id("edge", &is_taken, &mut issued),
                source: source.clone(),
                target: target.clone(),
                kind: EdgeKind::Explicit,
                label: edge.label.clone(),
            })
        })
        .collect();

    PastedFragment {
        nodes,
        edges,
        id_map,
    }
}

fn fresh_id(
    prefix: &str,
    is_taken: &impl Fn(&str) -> bool,
    issued: &mut AHashSet<String>,
) -> String {
    loop {
        let id = format!("{}-{}", prefix, Uuid::new_v4().simple());
        if !is_taken(&id) && issued.insert(id.clone()) {
            return id;
        }
    }
}

fn remap_references(data: &mut NodeData, id_map: &AHashMap<String, String>) {
    let NodeData::Response(response) = data else {
        return;
    };
    if let Some(target) = response.fallback_node_id.as_mut() {
        if let Some(mapped) = id_map.get(target.as_str()) {
            *target = mapped.clone();
        }
    }
    for rule in &mut response.rules {
        if let Some(mapped) = id_map.get(&rule.target_node_id) {
            rule.target_node_id = mapped.clone();
        }
    }
    for option in &mut response.options {
        if let Some(next) = option.next_node_id.as_mut() {
            if let Some(mapped) = id_map.get(next.as_str()) {
                *next = mapped.clone();
            }
        }
    }
}

/// Holds the most recent copy for the lifetime of an editing session.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    payload: Option<ClipboardPayload>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies the selection. An empty selection is a no-op that keeps the previous payload.
    pub fn copy<'a>(
        &mut self,
        selected: impl IntoIterator<Item = &'a Node>,
        explicit_edges: &[Edge],
    ) -> Option<&ClipboardPayload> {
        let payload = capture(selected, explicit_edges);
        if payload.nodes.is_empty() {
            return None;
        }
        self.payload = Some(payload);
        self.payload.as_ref()
    }

    pub fn payload(&self) -> Option<&ClipboardPayload> {
        self.payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    pub fn clear(&mut self) {
        self.payload = None;
    }

    /// Duplicates the held payload; `None` when nothing has been copied.
    pub fn paste(
        &self,
        offset: Position,
        policy: PasteReferencePolicy,
        is_taken: impl Fn(&str) -> bool,
    ) -> Option<PastedFragment> {
        self.payload
            .as_ref()
            .map(|payload| duplicate(payload, offset, policy, is_taken))
    }
}
