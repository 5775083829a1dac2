//! # simflow - Workflow Graph Authoring Core
//!
//! **simflow** is the editing core behind a visual builder for branching assessment
//! workflows. A workflow is a directed graph of prompt steps (email, voice call, chat) and
//! response steps whose answers branch through fallback targets and conditional rules. The
//! crate owns the graph and everything that keeps it consistent; rendering, pointer
//! handling and forms stay with the host UI.
//!
//! ## Core Workflow
//!
//! 1.  **Open a Session**: Use `Session::builder` with an optional `EditorConfig`, a saved
//!     `CanvasDocument` and the persona list.
//! 2.  **Edit**: Forward user actions (drops, property edits, connections, key chords) to
//!     the session. Invalid connections come back as a `ConnectionRejection` suitable for a
//!     user notice.
//! 3.  **Render**: Read `Session::all_edges` (explicit plus derived fallback and conditional
//!     edges) and `Session::connectivity` to flag orphaned steps.
//! 4.  **Tick and Save**: Call `Session::poll` from the event loop so bursts of edits become
//!     single undo steps, and persist `Session::document` whenever needed.
//!
//! ## Quick Start
//!
//! ```rust
//! use simflow::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut session = Session::builder().build();
//!
//!     session.add_node(Node::with_defaults("email", NodeKind::EmailPrompt, Position::new(0.0, 0.0)))?;
//!     session.add_node(Node::with_defaults("reply", NodeKind::Response, Position::new(0.0, 150.0)))?;
//!     session.add_node(Node::with_defaults("retry", NodeKind::Chat, Position::new(200.0, 300.0)))?;
//!     session.connect("email", "reply")?;
//!
//!     // Branch long answers to the chat step.
//!     session.update_node_data(
//!         "reply",
//!         ResponsePatch {
//!             rules: Some(vec![Rule::new("r1", ConditionType::TextLength, Operator::GreaterThan, 100.0, "retry")]),
//!             ..Default::default()
//!         },
//!     )?;
//!
//!     for edge in session.all_edges() {
//!         println!("{} -> {} ({:?})", edge.source, edge.target, edge.label);
//!     }
//!     assert!(session.connectivity().orphan_ids.is_empty());
//!
//!     // Email steps may only lead to response or chat steps.
//!     assert!(session.connect("email", "email").is_err());
//!
//!     let saved = session.document().to_json()?;
//!     println!("{}", saved);
//!     Ok(())
//! }
//! ```

pub mod clipboard;
pub mod config;
pub mod error;
pub mod graph;
pub mod history;
pub mod input;
pub mod model;
pub mod persist;
pub mod prelude;
pub mod session;
pub mod validation;
