use crate::compiler::{ClassFailure, Diagnostic};
use crate::graph::{NodeId, PinRef};
use thiserror::Error;

/// Errors raised while constructing or comparing type specifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Type '{name}' is described both as an enum and as a non-enum type")]
    EnumFlagConflict { name: String },

    #[error("Generic parameter '{0}' cannot be used as a concrete type")]
    GenericParameter(String),
}

/// Errors raised immediately by graph mutations. The graph is left
/// unchanged whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Pins {a} and {b} cannot be connected: {detail}")]
    TypeMismatch { a: PinRef, b: PinRef, detail: String },

    #[error("Node {0} not found in method graph")]
    NodeNotFound(NodeId),

    #[error("Pin {0} not found in method graph")]
    PinNotFound(PinRef),

    #[error("Node id {0} is already in use")]
    NodeIdInUse(NodeId),

    #[error("Method graph already has an entry node ({0})")]
    DuplicateEntry(NodeId),

    #[error("The entry node {0} cannot be removed from its method")]
    EntryNodeRemoval(NodeId),

    #[error("Name '{name}' is already used in {scope}")]
    DuplicateName { scope: String, name: String },
}

/// Errors that abort translation of a single method.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranslationError {
    #[error("Input pin '{pin}' of node {node} ({node_label}) has no incoming connection")]
    MissingConnection {
        node: NodeId,
        node_label: String,
        pin: String,
    },

    #[error("Input pin '{pin}' of node {node} expects '{expected}' but is fed '{found}'")]
    TypeMismatch {
        node: NodeId,
        pin: String,
        expected: String,
        found: String,
    },

    #[error("Output pin '{pin}' of node {node} ({node_label}) is read outside the scope that produces it")]
    ValueOutOfScope {
        node: NodeId,
        node_label: String,
        pin: String,
    },

    #[error("Execution path re-enters node {node} ({node_label})")]
    ExecCycle { node: NodeId, node_label: String },

    #[error("Data dependencies of node {node} ({node_label}) form a cycle")]
    DataCycle { node: NodeId, node_label: String },

    #[error("Method graph has no entry node")]
    MissingEntry,

    #[error("Connection refers to missing pin {0}")]
    DanglingReference(PinRef),
}

impl TranslationError {
    /// Node the error is attributed to, if any.
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Self::MissingConnection { node, .. }
            | Self::TypeMismatch { node, .. }
            | Self::ValueOutOfScope { node, .. }
            | Self::ExecCycle { node, .. }
            | Self::DataCycle { node, .. } => Some(*node),
            Self::DanglingReference(pin) => Some(pin.node),
            Self::MissingEntry => None,
        }
    }
}

/// A translation failure tagged with the class (and method) it belongs to.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassTranslationError {
    #[error("Class '{class}' declares member '{name}' more than once")]
    DuplicateName { class: String, name: String },

    #[error("Failed to translate method '{class}.{method}': {error}")]
    Method {
        class: String,
        method: String,
        #[source]
        error: TranslationError,
    },
}

/// Errors from translating and compiling a whole project.
#[derive(Error, Debug, Clone)]
pub enum CompileError {
    #[error("{} class(es) failed to translate", .0.len())]
    Translation(Vec<ClassFailure>),

    #[error("External compiler reported {} error(s)", .diagnostics.len())]
    Compilation { diagnostics: Vec<Diagnostic> },
}

/// Errors loading translator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse translator configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors loading a type catalog from serialized descriptions.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse type descriptions: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid type description: {0}")]
    Type(#[from] TypeError),
}
