use crate::clipboard::PasteReferencePolicy;
use crate::error::ConfigError;
use crate::history::DEFAULT_MAX_HISTORY;
use crate::model::Position;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Editor policy knobs. Every field has a default, so a partial JSON object is valid.
///
/// ```json
/// { "maxHistory": 100, "debounceMs": 300, "pasteOffset": { "x": 40, "y": 40 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Snapshots kept in the undo stack.
    pub max_history: usize,
    /// Quiet period before a burst of edits becomes one undo step.
    pub debounce_ms: u64,
    /// Shift applied to pasted nodes.
    pub paste_offset: Position,
    pub paste_references: PasteReferencePolicy,
    /// Commit a pending undo step on teardown instead of dropping it.
    pub flush_on_teardown: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            debounce_ms: 500,
            paste_offset: Position::new(20.0, 20.0),
            paste_references: PasteReferencePolicy::Preserve,
            flush_on_teardown: false,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history == 0 {
            return Err(ConfigError::Invalid {
                field: "maxHistory",
                message: "must keep at least one snapshot".to_string(),
            });
        }
        if !self.paste_offset.x.is_finite() || !self.paste_offset.y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "pasteOffset",
                message: "coordinates must be finite".to_string(),
            });
        }
        Ok(())
    }

    pub fn debounce_interval(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
