use crate::model::{Edge, Node};
use std::collections::VecDeque;
use tracing::debug;

mod debounce;

pub use debounce::{Clock, Debouncer, ManualClock, SystemClock};

/// Default number of snapshots kept before the oldest is evicted.
pub const DEFAULT_MAX_HISTORY: usize = 50;

/// An immutable deep copy of a graph's nodes and explicit edges.
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl HistorySnapshot {
    pub fn new(nodes: &[Node], edges: &[Edge]) -> Self {
        Self {
            nodes: nodes.to_vec(),
            edges: edges.to_vec(),
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// A bounded undo/redo stack of graph snapshots with a cursor.
///
/// Pushing while the cursor is not at the top discards the redo branch. Undo and redo only
/// move the cursor; they never push.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<HistorySnapshot>,
    cursor: usize,
    max_size: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl HistoryManager {
    /// A `max_size` of zero is treated as one.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current snapshot, `None` while empty.
    pub fn cursor(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&HistorySnapshot> {
        self.cursor().and_then(|i| self.entries.get(i))
    }

    pub fn push_state(&mut self, nodes: &[Node], edges: &[Edge]) {
        if !self.entries.is_empty() {
            let discarded = self.entries.len() - (self.cursor + 1);
            if discarded > 0 {
                debug!(discarded, "discarding redo branch");
            }
            self.entries.truncate(self.cursor + 1);
        }

        self.entries.push_back(HistorySnapshot::new(nodes, edges));
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
            debug!(max = self.max_size, "evicted oldest snapshot");
        }
        self.cursor = self.entries.len() - 1;
        debug!(cursor = self.cursor, len = self.entries.len(), "pushed snapshot");
    }

    pub fn undo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        debug!(cursor = self.cursor, "undo");
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&HistorySnapshot> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        debug!(cursor = self.cursor, "redo");
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
