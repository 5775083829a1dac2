use super::rule::Rule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EdgeKind {
    /// Drawn by the user and persisted.
    #[default]
    Explicit,
    /// Derived from a response node's fallback target.
    Fallback,
    /// Derived from one of a response node's rules.
    Conditional,
}

impl EdgeKind {
    pub fn is_derived(self) -> bool {
        !matches!(self, EdgeKind::Explicit)
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub kind: EdgeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn explicit(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            kind: EdgeKind::Explicit,
            label: None,
        }
    }

    pub fn fallback(source: &str, target: &str) -> Self {
        Self {
            id: format!("fallback-{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            kind: EdgeKind::Fallback,
            label: None,
        }
    }

    /// The rule id is part of the edge id so two rules sharing a target stay distinct.
    pub fn conditional(source: &str, rule: &Rule) -> Self {
        Self {
            id: format!("conditional-{}-{}-{}", source, rule.id, rule.target_node_id),
            source: source.to_string(),
            target: rule.target_node_id.clone(),
            kind: EdgeKind::Conditional,
            label: Some(rule.summary()),
        }
    }

    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}
