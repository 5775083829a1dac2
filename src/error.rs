use crate::model::NodeKind;
use thiserror::Error;

/// Errors returned by graph store mutations. A failed mutation leaves the store unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("A node with id '{0}' already exists")]
    DuplicateNode(String),

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Node '{node_id}' is a {found} node and cannot be patched as a {expected} node")]
    KindMismatch {
        node_id: String,
        expected: NodeKind,
        found: NodeKind,
    },

    #[error("An edge with id '{0}' already exists")]
    DuplicateEdge(String),

    #[error("Explicit edge '{0}' not found")]
    EdgeNotFound(String),

    #[error("Edge '{edge_id}' references node '{node_id}', which does not exist")]
    DanglingEndpoint { edge_id: String, node_id: String },

    #[error("Only explicit edges can be stored, but edge '{0}' is derived")]
    DerivedEdge(String),

    #[error("Rule '{rule_id}' on node '{node_id}' is invalid: {message}")]
    InvalidRule {
        node_id: String,
        rule_id: String,
        message: String,
    },
}

/// Why a proposed explicit connection was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionRejection {
    #[error("Cannot connect to non-existent node '{0}' (endpoint missing)")]
    EndpointMissing(String),

    #[error(
        "A {source_kind} node can only connect to Response or Chat nodes, not to a {target_kind} node (incompatible source/target type)"
    )]
    IncompatibleTypes {
        source_kind: NodeKind,
        target_kind: NodeKind,
    },
}

/// Errors raised while reading or writing persisted canvas data.
#[derive(Error, Debug, Clone)]
pub enum PersistError {
    #[error("I/O error on '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse canvas JSON: {0}")]
    JsonParse(String),

    #[error("Failed to serialize canvas JSON: {0}")]
    JsonWrite(String),
}

/// Errors raised while loading an editor configuration.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },
}

/// A node-kind identifier (from a drop payload or persisted JSON) that names no known kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown node kind '{0}'")]
pub struct UnknownNodeKind(pub String);

/// Errors returned by session edits that go through connection checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Rejected(#[from] ConnectionRejection),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
