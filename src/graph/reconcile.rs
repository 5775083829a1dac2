use crate::model::{Node, NodeData};
use ahash::AHashSet;
use tracing::debug;

/// Counts of stale references cleared by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub fallbacks_cleared: usize,
    pub rules_pruned: usize,
    pub options_cleared: usize,
    pub personas_cleared: usize,
}

impl ReconcileReport {
    pub fn changed(&self) -> bool {
        self.fallbacks_cleared + self.rules_pruned + self.options_cleared + self.personas_cleared
            > 0
    }
}

/// Clears every reference that no longer resolves.
///
/// Fallback targets, rule targets and multiple-choice successors are checked against the
/// node set. Chat personas are checked against `persona_ids` when a persona list is known;
/// with `None` persona references are left alone. Running it twice changes nothing the
/// second time.
pub(crate) fn reconcile(
    nodes: &mut [Node],
    persona_ids: Option<&AHashSet<String>>,
) -> ReconcileReport {
    let node_ids: AHashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    let mut report = ReconcileReport::default();

    for node in nodes.iter_mut() {
        match &mut node.data {
            NodeData::Response(data) => {
                if let Some(target) = &data.fallback_node_id {
                    if !node_ids.contains(target) {
                        debug!(node = %node.id, target = %target, "clearing dangling fallback");
                        data.fallback_node_id = None;
                        data.has_fallback = false;
                        report.fallbacks_cleared += 1;
                    }
                }

                let before = data.rules.len();
                data.rules.retain(|rule| node_ids.contains(&rule.target_node_id));
                let pruned = before - data.rules.len();
                if pruned > 0 {
                    debug!(node = %node.id, pruned, "pruning dangling rules");
                    report.rules_pruned += pruned;
                }

                for option in data.options.iter_mut() {
                    let dangling = option
                        .next_node_id
                        .as_ref()
                        .is_some_and(|next| !node_ids.contains(next));
                    if dangling {
                        option.next_node_id = None;
                        report.options_cleared += 1;
                    }
                }
            }
            NodeData::Chat(data) => {
                let Some(personas) = persona_ids else {
                    continue;
                };
                if let Some(persona) = &data.persona_id {
                    if !personas.contains(persona) {
                        debug!(node = %node.id, persona = %persona, "clearing deleted persona");
                        data.persona_id = None;
                        report.personas_cleared += 1;
                    }
                }
            }
            NodeData::EmailPrompt(_) | NodeData::VoicePrompt(_) => {}
        }
    }

    report
}
