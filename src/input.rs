//! Keyboard shortcuts and drag-and-drop payloads handed to the editor core by the host UI.

use crate::error::UnknownNodeKind;
use crate::model::NodeKind;

/// An editor command bound to a key chord.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    Undo,
    Redo,
    Copy,
    Paste,
}

/// A key press together with its modifiers. `meta` is Cmd on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyChord {
    pub key: char,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn new(key: char) -> Self {
        Self {
            key,
            ..Self::default()
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            key,
            ctrl: true,
            ..Self::default()
        }
    }

    pub fn cmd(key: char) -> Self {
        Self {
            key,
            meta: true,
            ..Self::default()
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl Shortcut {
    /// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo, Ctrl/Cmd+C copies and
    /// Ctrl/Cmd+V pastes. Anything else is not a shortcut.
    pub fn from_chord(chord: &KeyChord) -> Option<Self> {
        if !(chord.ctrl || chord.meta) {
            return None;
        }
        match chord.key.to_ascii_lowercase() {
            'z' if chord.shift => Some(Shortcut::Redo),
            'z' => Some(Shortcut::Undo),
            'y' => Some(Shortcut::Redo),
            'c' => Some(Shortcut::Copy),
            'v' => Some(Shortcut::Paste),
            _ => None,
        }
    }
}

/// Whether the core handled a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Handled; the host must suppress the platform's default action.
    Consumed,
    Ignored,
}

impl KeyOutcome {
    pub fn prevents_default(self) -> bool {
        matches!(self, KeyOutcome::Consumed)
    }
}

/// What arrived with a drop: the node-kind identifier carried by the platform's transfer
/// channel, if it delivered one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropPayload {
    pub primary: Option<String>,
}

impl DropPayload {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            primary: Some(kind.into()),
        }
    }

    /// A drop where the platform lost the transfer data.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Same-session record of the kind being dragged from the palette. Used when the primary
/// transfer channel comes through empty.
#[derive(Debug, Clone, Default)]
pub struct DragContext {
    kind: Option<String>,
}

impl DragContext {
    pub fn begin(&mut self, kind: impl Into<String>) {
        self.kind = Some(kind.into());
    }

    pub fn pending(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn clear(&mut self) {
        self.kind = None;
    }

    /// Picks the kind identifier for a drop: the primary channel when it is non-empty,
    /// otherwise the drag context, which is consumed. `Ok(None)` means no identifier at all.
    pub fn resolve(&mut self, payload: &DropPayload) -> Result<Option<NodeKind>, UnknownNodeKind> {
        let identifier = match payload.primary.as_deref().map(str::trim) {
            Some(primary) if !primary.is_empty() => Some(primary.to_string()),
            _ => self.kind.take(),
        };
        identifier.map(|id| id.parse()).transpose()
    }
}
