//! Structural graph errors.

use super::error_code::{self, TetradErrorCode};

/// A rejected graph mutation. The graph is left unchanged whenever one of
/// these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("node not in graph: {name}")]
    NodeNotFound { name: String },

    #[error("node already in graph: {name}")]
    DuplicateNode { name: String },

    #[error("edge already present between {node1} and {node2}")]
    DuplicateEdge { node1: String, node2: String },

    #[error("no edge between {node1} and {node2}")]
    EdgeNotFound { node1: String, node2: String },

    #[error("self loop on {name}")]
    SelfLoop { name: String },

    #[error("cycle detected: {path}")]
    CycleDetected { path: String },

    #[error("edge {edge} is not directed")]
    NotDirected { edge: String },

    #[error("edge {edge} violates background knowledge: {reason}")]
    KnowledgeViolation { edge: String, reason: String },
}

impl TetradErrorCode for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::CycleDetected { .. } => error_code::CYCLE_DETECTED,
            _ => error_code::GRAPH_ERROR,
        }
    }
}
