//! One editing session over one canvas.
//!
//! A [`Session`] owns the graph store, the undo history and the clipboard, and wires them
//! together the way the canvas expects: every graph edit (re)starts the history debounce,
//! undo and redo swap whole snapshots without recording themselves, and paste goes through
//! the same store checks as any other insert.
//!
//! Time only moves through the session's [`Clock`]. Hosts call [`Session::poll`] from
//! their event loop to commit a history step once the quiet period has passed.
//!
//! ```
//! use simflow::prelude::*;
//!
//! let mut session = Session::builder().build();
//! let origin = Position::default();
//! session.add_node(Node::with_defaults("email", NodeKind::EmailPrompt, origin)).unwrap();
//! session.add_node(Node::with_defaults("reply", NodeKind::Response, origin)).unwrap();
//! session.connect("email", "reply").unwrap();
//!
//! // The three edits fall inside one quiet period, so one undo reverts them all.
//! assert!(session.undo());
//! assert!(session.nodes().is_empty());
//! ```

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::error::{GraphError, SessionError};
use crate::graph::{
    Connectivity, GraphStore, NodePatch, ReconcileReport, ResponsePatch, validate_connection,
};
use crate::history::{Clock, Debouncer, HistoryManager, SystemClock};
use crate::input::{DragContext, DropPayload, KeyChord, KeyOutcome, Shortcut};
use crate::model::{Edge, Node, NodeKind, Persona, Position};
use crate::persist::{CanvasDocument, DEFAULT_SIMULATION_NAME};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct SessionBuilder {
    config: EditorConfig,
    clock: Option<Arc<dyn Clock>>,
    document: Option<CanvasDocument>,
    personas: Option<Vec<Persona>>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: EditorConfig::default(),
            clock: None,
            document: None,
            personas: None,
        }
    }

    pub fn config(mut self, config: EditorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Starts from a saved canvas instead of an empty one.
    pub fn document(mut self, document: CanvasDocument) -> Self {
        self.document = Some(document);
        self
    }

    /// Enables persona reconciliation from the start. Without this, chat persona references
    /// are left alone until [`Session::set_personas`] is called.
    pub fn personas(mut self, personas: Vec<Persona>) -> Self {
        self.personas = Some(personas);
        self
    }

    /// Builds the session with its loaded graph recorded as the first history step.
    pub fn build(self) -> Session {
        let config = self.config;
        let mut session = Session {
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            store: GraphStore::new(),
            history: HistoryManager::new(config.max_history),
            debouncer: Debouncer::new(config.debounce_interval()),
            clipboard: Clipboard::new(),
            drag: DragContext::default(),
            simulation_name: DEFAULT_SIMULATION_NAME.to_string(),
            config,
        };
        if let Some(personas) = self.personas {
            session
                .store
                .set_persona_ids(personas.into_iter().map(|p| p.id));
        }
        session.load_document(self.document.unwrap_or_default());
        session
    }
}

pub struct Session {
    config: EditorConfig,
    clock: Arc<dyn Clock>,
    store: GraphStore,
    history: HistoryManager,
    debouncer: Debouncer,
    clipboard: Clipboard,
    drag: DragContext,
    simulation_name: String,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    /// Explicit edges followed by derived edges, the set the canvas renders.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.store.all_edges()
    }

    pub fn connectivity(&self) -> &Connectivity {
        self.store.connectivity()
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn simulation_name(&self) -> &str {
        &self.simulation_name
    }

    pub fn set_simulation_name(&mut self, name: impl Into<String>) {
        self.simulation_name = name.into();
    }

    /// Whether a history push is waiting for its quiet period.
    pub fn has_pending_push(&self) -> bool {
        self.debouncer.is_pending()
    }

    // --- graph edits ---

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, node: Node) -> Result<String, GraphError> {
        let id = node.id.clone();
        self.store.add_node(node)?;
        self.schedule_push();
        Ok(id)
    }

    /// Creates a node from a palette drop. The kind comes from the drop payload, or from the
    /// drag context when the payload is empty. Returns the new node's id, or `None` when no
    /// known kind could be determined.
    pub fn drop_node(&mut self, payload: &DropPayload, position: Position) -> Option<String> {
        let kind = match self.drag.resolve(payload) {
            Ok(Some(kind)) => kind,
            Ok(None) => {
                warn!("drop carried no node kind");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "ignoring drop");
                return None;
            }
        };

        match self.add_node(Node::with_defaults(fresh_node_id(kind), kind, position)) {
            Ok(id) => {
                debug!(node = %id, %kind, "dropped node");
                Some(id)
            }
            Err(e) => {
                warn!(error = %e, "could not place dropped node");
                None
            }
        }
    }

    /// Places a new node of `kind` below and to the right of a response node and makes it
    /// that node's active fallback. Both changes form one history step.
    pub fn create_fallback_node(
        &mut self,
        response_id: &str,
        kind: NodeKind,
    ) -> Result<String, GraphError> {
        let response = self
            .store
            .node(response_id)
            .ok_or_else(|| GraphError::NodeNotFound(response_id.to_string()))?;
        if response.kind() != NodeKind::Response {
            return Err(GraphError::KindMismatch {
                node_id: response_id.to_string(),
                expected: NodeKind::Response,
                found: response.kind(),
            });
        }
        let position = response.position.offset(FALLBACK_OFFSET);

        let id = fresh_node_id(kind);
        self.store
            .add_node(Node::with_defaults(id.clone(), kind, position))?;
        let patch = ResponsePatch {
            has_fallback: Some(true),
            fallback_node_id: Some(Some(id.clone())),
            ..Default::default()
        };
        if let Err(e) = self.store.update_node_data(response_id, patch.into()) {
            self.store.remove_node(&id)?;
            return Err(e);
        }

        self.schedule_push();
        debug!(node = %id, response = %response_id, %kind, "created fallback node");
        Ok(id)
    }

    /// Records the kind being dragged from the palette, for drops whose payload comes
    /// through empty.
    pub fn begin_drag(&mut self, kind: impl Into<String>) {
        self.drag.begin(kind);
    }

    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let removed = self.store.remove_node(id)?;
        self.schedule_push();
        Ok(removed)
    }

    pub fn update_node_data(
        &mut self,
        id: &str,
        patch: impl Into<NodePatch>,
    ) -> Result<(), GraphError> {
        self.store.update_node_data(id, patch.into())?;
        self.schedule_push();
        Ok(())
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> Result<(), GraphError> {
        self.store.move_node(id, position)?;
        self.schedule_push();
        Ok(())
    }

    /// Selects exactly the given nodes. Selection alone does not start a history step.
    pub fn select<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        self.store.select_only(ids);
    }

    pub fn clear_selection(&mut self) {
        self.store.clear_selection();
    }

    /// Draws an explicit edge after checking that the connection is legal. Connecting two
    /// nodes that already share an explicit edge in that direction returns the existing id.
    pub fn connect(&mut self, source: &str, target: &str) -> Result<String, SessionError> {
        if let Err(rejection) = validate_connection(self.store.nodes(), source, target) {
            warn!(%source, %target, reason = %rejection, "connection rejected");
            return Err(rejection.into());
        }
        if let Some(existing) = self
            .store
            .explicit_edges()
            .iter()
            .find(|e| e.source == source && e.target == target)
        {
            return Ok(existing.id.clone());
        }

        let id = format!("edge-{}", Uuid::new_v4().simple());
        self.store
            .add_explicit_edge(Edge::explicit(id.clone(), source, target))?;
        self.schedule_push();
        Ok(id)
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Result<Edge, SessionError> {
        let removed = self.store.remove_explicit_edge(edge_id)?;
        self.schedule_push();
        Ok(removed)
    }

    /// Replaces the persona list the graph is checked against. Chat steps pointing at a
    /// persona that is no longer listed lose the reference.
    pub fn set_personas(&mut self, personas: &[Persona]) -> ReconcileReport {
        let report = self
            .store
            .set_persona_ids(personas.iter().map(|p| p.id.clone()));
        if report.changed() {
            self.schedule_push();
        }
        report
    }

    // --- clipboard ---

    /// Copies the selected nodes and the explicit edges between them. Returns how many nodes
    /// were copied; zero leaves the clipboard as it was.
    pub fn copy(&mut self) -> usize {
        let copied = self
            .clipboard
            .copy(self.store.selected_nodes(), self.store.explicit_edges())
            .map_or(0, |payload| payload.nodes.len());
        if copied > 0 {
            debug!(nodes = copied, "copied selection");
        }
        copied
    }

    /// Pastes the clipboard. The pasted nodes become the selection. Returns their ids, or
    /// `None` when the clipboard is empty.
    pub fn paste(&mut self) -> Option<Vec<String>> {
        let store = &self.store;
        let fragment = self.clipboard.paste(
            self.config.paste_offset,
            self.config.paste_references,
            |id| store.contains_node(id) || store.edge(id).is_some(),
        )?;

        let ids: Vec<String> = fragment.nodes.iter().map(|n| n.id.clone()).collect();
        if let Err(e) = self.store.insert_all(fragment.nodes, fragment.edges) {
            warn!(error = %e, "paste rejected");
            return None;
        }
        self.store.select_only(ids.iter().map(String::as_str));
        debug!(nodes = ids.len(), "pasted");
        self.schedule_push();
        Some(ids)
    }

    // --- history ---

    /// Steps back one snapshot. An edit still waiting for its quiet period is committed
    /// first, so it is the one undone.
    pub fn undo(&mut self) -> bool {
        self.flush();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        let (nodes, edges) = (snapshot.nodes().to_vec(), snapshot.edges().to_vec());
        self.store.replace_all(nodes, edges);
        true
    }

    pub fn redo(&mut self) -> bool {
        self.flush();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        let (nodes, edges) = (snapshot.nodes().to_vec(), snapshot.edges().to_vec());
        self.store.replace_all(nodes, edges);
        true
    }

    /// A pending edit counts: undo would commit it and then step back over it.
    pub fn can_undo(&self) -> bool {
        self.debouncer.is_pending() || self.history.can_undo()
    }

    /// A pending edit would discard the redo branch when committed.
    pub fn can_redo(&self) -> bool {
        !self.debouncer.is_pending() && self.history.can_redo()
    }

    /// Commits the pending history step if its quiet period has passed.
    pub fn poll(&mut self) -> bool {
        if self.debouncer.fire_if_due(self.clock.now()) {
            self.push_snapshot();
            true
        } else {
            false
        }
    }

    /// Commits the pending history step now, if there is one.
    pub fn flush(&mut self) -> bool {
        if self.debouncer.cancel() {
            self.push_snapshot();
            true
        } else {
            false
        }
    }

    // --- input ---

    pub fn handle_key(&mut self, chord: &KeyChord) -> KeyOutcome {
        let Some(shortcut) = Shortcut::from_chord(chord) else {
            return KeyOutcome::Ignored;
        };
        debug!(?shortcut, "shortcut");
        match shortcut {
            Shortcut::Undo => {
                self.undo();
            }
            Shortcut::Redo => {
                self.redo();
            }
            Shortcut::Copy => {
                self.copy();
            }
            Shortcut::Paste => {
                self.paste();
            }
        }
        KeyOutcome::Consumed
    }

    // --- persistence ---

    /// Replaces the whole canvas. History restarts with the loaded graph as its only step.
    pub fn load_document(&mut self, document: CanvasDocument) {
        self.debouncer.cancel();
        info!(
            name = %document.simulation_name,
            nodes = document.nodes.len(),
            edges = document.edges.len(),
            "loading canvas"
        );
        self.simulation_name = document.simulation_name;
        self.store.replace_all(document.nodes, document.edges);
        self.history.clear();
        self.push_snapshot();
    }

    /// The current canvas in its saved form.
    pub fn document(&self) -> CanvasDocument {
        CanvasDocument::capture(&self.store, self.simulation_name.clone())
    }

    /// Ends the session's scheduled work. A pending history step is committed when
    /// `flush_on_teardown` is set and dropped otherwise.
    pub fn teardown(&mut self) {
        if self.config.flush_on_teardown {
            self.flush();
        } else if self.debouncer.cancel() {
            debug!("dropped pending history push on teardown");
        }
    }

    fn schedule_push(&mut self) {
        self.debouncer.schedule(self.clock.now());
    }

    fn push_snapshot(&mut self) {
        self.history
            .push_state(self.store.nodes(), self.store.explicit_edges());
    }
}

const FALLBACK_OFFSET: Position = Position { x: 200.0, y: 100.0 };

fn fresh_node_id(kind: NodeKind) -> String {
    format!("{}-{}", kind.type_name(), Uuid::new_v4().simple())
}

impl Drop for Session {
    fn drop(&mut self) {
        self.debouncer.cancel();
    }
}
