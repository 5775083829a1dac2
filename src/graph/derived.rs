use crate::model::{Edge, Node};
use ahash::AHashSet;

/// Computes the implicit edges carried by node data: one fallback edge per response node
/// whose fallback target exists, and one conditional edge per rule whose target exists.
///
/// The result depends only on `nodes` and the ids are deterministic, so calling this twice
/// on the same input yields the same edge list, in the same order.
pub fn derive_edges(nodes: &[Node]) -> Vec<Edge> {
    let ids: AHashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut edges = Vec::new();

    for node in nodes {
        let Some(response) = node.as_response() else {
            continue;
        };

        if let Some(target) = response.active_fallback() {
            if ids.contains(target) {
                edges.push(Edge::fallback(&node.id, target));
            }
        }

        edges.extend(
            response
                .rules
                .iter()
                .filter(|rule| ids.contains(rule.target_node_id.as_str()))
                .map(|rule| Edge::conditional(&node.id, rule)),
        );
    }

    edges
}
