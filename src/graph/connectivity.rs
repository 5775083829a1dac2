use crate::model::{Edge, Node};
use ahash::AHashSet;

/// Which nodes take part in at least one edge, and which are stranded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connectivity {
    pub orphan_ids: AHashSet<String>,
    pub connected_ids: AHashSet<String>,
}

impl Connectivity {
    pub fn is_orphan(&self, node_id: &str) -> bool {
        self.orphan_ids.contains(node_id)
    }

    pub fn is_connected(&self, node_id: &str) -> bool {
        self.connected_ids.contains(node_id)
    }
}

/// Computes connectivity over every edge given, explicit or derived alike.
///
/// A graph with a single node never reports an orphan: there is nothing to connect it to.
pub fn compute_connectivity<'a>(
    nodes: &[Node],
    edges: impl IntoIterator<Item = &'a Edge>,
) -> Connectivity {
    let mut connected_ids = AHashSet::new();
    for edge in edges {
        connected_ids.insert(edge.source.clone());
        connected_ids.insert(edge.target.clone());
    }

    let orphan_ids = if nodes.len() > 1 {
        nodes
            .iter()
            .filter(|n| !connected_ids.contains(&n.id))
            .map(|n| n.id.clone())
            .collect()
    } else {
        AHashSet::new()
    };

    Connectivity {
        orphan_ids,
        connected_ids,
    }
}
