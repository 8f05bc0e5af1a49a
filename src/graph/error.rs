//! Errors reported by the dependency graph.

use super::CycleInfo;
use std::fmt;

/// Why an edge was rejected even though both modules exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidEdgeKind {
    /// `origin == target`
    SelfDependency,
    /// The edge is already stored
    Duplicate,
}

impl fmt::Display for InvalidEdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfDependency => write!(f, "a module cannot depend on itself"),
            Self::Duplicate => write!(f, "dependency already exists"),
        }
    }
}

/// Errors that can occur when mutating or ordering the graph.
///
/// Every failing operation leaves the graph unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A module with this name is already registered.
    #[error("module '{0}' already exists")]
    AlreadyExists(String),

    /// Module names are identities and must not be empty.
    #[error("module name must not be empty")]
    EmptyName,

    /// The named module is not registered.
    #[error("module '{0}' not found")]
    NotFound(String),

    /// The edge to remove does not exist.
    #[error("dependency '{origin}' -> '{target}' not found")]
    MissingDependency { origin: String, target: String },

    /// The edge would be a self-loop or a duplicate.
    #[error("invalid dependency '{origin}' -> '{target}': {kind}")]
    InvalidEdge {
        origin: String,
        target: String,
        kind: InvalidEdgeKind,
    },

    /// No build order exists while the graph has cycles.
    #[error("dependency graph contains {} cycle(s)", cycles.len())]
    CyclePresent { cycles: Vec<CycleInfo> },
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
