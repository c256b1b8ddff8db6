//! Error types for graph construction and analysis.
//!
//! Every failure is returned to the caller as a value. A rejected call
//! never leaves a store partially mutated.

use serde::Serialize;
use thiserror::Error;

/// Which id space an invalid reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VertexClass {
    /// A vertex of a [`GraphStore`](crate::GraphStore).
    Vertex,
    /// A user of a [`Recommender`](crate::Recommender).
    User,
    /// An item of a [`Recommender`](crate::Recommender).
    Item,
}

impl std::fmt::Display for VertexClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Vertex => "vertex",
            Self::User => "user",
            Self::Item => "item",
        };
        write!(f, "{}", s)
    }
}

/// Errors produced by the graph store and its algorithms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("invalid {class} {id}: only {count} exist")]
    InvalidVertex {
        class: VertexClass,
        id: usize,
        count: usize,
    },

    #[error("negative weight {weight} on edge {from} -> {to}")]
    NegativeWeight { from: usize, to: usize, weight: f64 },

    #[error("non-finite weight {weight} on edge {from} -> {to}")]
    NonFiniteWeight { from: usize, to: usize, weight: f64 },

    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("heuristic has {actual} entries, graph has {expected} vertices")]
    HeuristicLength { expected: usize, actual: usize },

    #[error("damping factor {0} is outside [0, 1]")]
    InvalidDamping(f64),
}

impl GraphError {
    pub(crate) fn invalid_vertex(id: usize, count: usize) -> Self {
        Self::InvalidVertex {
            class: VertexClass::Vertex,
            id,
            count,
        }
    }
}

/// Errors raised while loading an [`AnalysisConfig`](crate::AnalysisConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] GraphError),
}

pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_vertex_message() {
        let err = GraphError::invalid_vertex(7, 3);
        assert_eq!(err.to_string(), "invalid vertex 7: only 3 exist");

        let err = GraphError::InvalidVertex {
            class: VertexClass::Item,
            id: 4,
            count: 4,
        };
        assert_eq!(err.to_string(), "invalid item 4: only 4 exist");
    }
}
