use crate::error::ConnectionRejection;
use crate::model::{Node, NodeKind};

/// Decides whether the user may draw an explicit edge from `source` to `target`.
///
/// Checks run in order: both endpoints must exist, then prompt nodes (email and voice)
/// may only lead to a response or chat node. Everything else is accepted. Derived edges
/// never pass through here.
pub fn validate_connection(
    nodes: &[Node],
    source: &str,
    target: &str,
) -> Result<(), ConnectionRejection> {
    let source_node = find(nodes, source)?;
    let target_node = find(nodes, target)?;

    let (source_kind, target_kind) = (source_node.kind(), target_node.kind());
    if source_kind.is_prompt() && !matches!(target_kind, NodeKind::Response | NodeKind::Chat) {
        return Err(ConnectionRejection::IncompatibleTypes {
            source_kind,
            target_kind,
        });
    }

    Ok(())
}

fn find<'a>(nodes: &'a [Node], id: &str) -> Result<&'a Node, ConnectionRejection> {
    nodes
        .iter()
        .find(|n| n.id == id)
        .ok_or_else(|| ConnectionRejection::EndpointMissing(id.to_string()))
}
