//! Prelude module for convenient imports
//!
//! Re-exports the types most hosts need to open a session, edit a canvas and save it.
//!
//! ```rust
//! use simflow::prelude::*;
//!
//! let document = CanvasDocument::load_or_default(None);
//! let session = Session::builder().document(document).build();
//! assert_eq!(session.simulation_name(), DEFAULT_SIMULATION_NAME);
//! ```

// Session and its inputs
pub use crate::config::EditorConfig;
pub use crate::input::{DropPayload, KeyChord, KeyOutcome, Shortcut};
pub use crate::session::{Session, SessionBuilder};

// Graph model
pub use crate::model::{
    ChatData, ChoiceOption, ConditionType, Edge, EdgeKind, EmailPromptData, Node, NodeData,
    NodeKind, Operator, Persona, Position, ResponseData, ResponseType, Rule, RuleLogic,
    RuleValue, VoicePromptData,
};

// Store, derivation and analysis
pub use crate::graph::{
    ChatPatch, Connectivity, EmailPromptPatch, GraphStore, NodePatch, ResponsePatch,
    VoicePromptPatch, compute_connectivity, derive_edges, validate_connection,
};

// History and clipboard
pub use crate::clipboard::{Clipboard, PasteReferencePolicy};
pub use crate::history::{Clock, HistoryManager, ManualClock, SystemClock};

// Persistence and validation
pub use crate::persist::{CanvasDocument, DEFAULT_SIMULATION_NAME};
pub use crate::validation::{FieldIssue, validate_node};

// Error types
pub use crate::error::{ConnectionRejection, GraphError, PersistError, SessionError};
