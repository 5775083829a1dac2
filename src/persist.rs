//! The saved form of a canvas and the persona list.

use crate::error::PersistError;
use crate::graph::GraphStore;
use crate::model::{Edge, EdgeKind, Node, Persona};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

pub const DEFAULT_SIMULATION_NAME: &str = "Untitled Simulation";

/// A saved canvas. Only explicit edges are stored; derived edges are rebuilt on load.
///
/// Nodes that cannot be read, such as ones of an unknown kind, are skipped on load.
/// Edges left pointing at them are dropped when the document is loaded into a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    #[serde(default, deserialize_with = "readable_nodes")]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default = "default_name")]
    pub simulation_name: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

fn default_name() -> String {
    DEFAULT_SIMULATION_NAME.to_string()
}

fn readable_nodes<'de, D>(deserializer: D) -> Result<Vec<Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Node>(value) {
            Ok(node) => Some(node),
            Err(e) => {
                warn!(error = %e, "skipping unreadable node in saved canvas");
                None
            }
        })
        .collect())
}

impl Default for CanvasDocument {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            simulation_name: default_name(),
            timestamp: Utc::now(),
        }
    }
}

impl CanvasDocument {
    /// Snapshots the store, stamped with the current time.
    pub fn capture(store: &GraphStore, simulation_name: impl Into<String>) -> Self {
        Self {
            nodes: store.nodes().to_vec(),
            edges: store
                .explicit_edges()
                .iter()
                .filter(|e| e.kind == EdgeKind::Explicit)
                .cloned()
                .collect(),
            simulation_name: simulation_name.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PersistError> {
        serde_json::from_str(json).map_err(|e| PersistError::JsonParse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, PersistError> {
        serde_json::to_string_pretty(self).map_err(|e| PersistError::JsonWrite(e.to_string()))
    }

    /// Parses a stored canvas, falling back to an empty one when it is absent or malformed.
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(document) => document,
            Err(e) => {
                error!(error = %e, "failed to load saved canvas, starting empty");
                Self::default()
            }
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let path = path.as_ref();
        Self::from_json(&read(path)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|e| io_error(path, e))?;
        info!(
            path = %path.display(),
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "saved canvas"
        );
        Ok(())
    }
}

pub fn personas_from_json(json: &str) -> Result<Vec<Persona>, PersistError> {
    serde_json::from_str(json).map_err(|e| PersistError::JsonParse(e.to_string()))
}

/// Parses a stored persona list, falling back to none when it is absent or malformed.
pub fn load_personas_or_default(json: Option<&str>) -> Vec<Persona> {
    let Some(json) = json else {
        return Vec::new();
    };
    personas_from_json(json).unwrap_or_else(|e| {
        error!(error = %e, "failed to load saved personas");
        Vec::new()
    })
}

pub fn personas_from_file(path: impl AsRef<Path>) -> Result<Vec<Persona>, PersistError> {
    personas_from_json(&read(path.as_ref())?)
}

fn read(path: &Path) -> Result<String, PersistError> {
    fs::read_to_string(path).map_err(|e| io_error(path, e))
}

fn io_error(path: &Path, e: std::io::Error) -> PersistError {
    PersistError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}
