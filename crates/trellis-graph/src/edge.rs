//! Edge and adjacency entry types.
//!
//! An edge is either directed or undirected. Undirected edges are stored
//! once in the edge list but appear in the adjacency of both endpoints.

use crate::graph::VertexId;
use serde::{Deserialize, Serialize};

/// Whether an edge can be walked in one direction or both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Only `from -> to` is walkable.
    Directed,

    /// Both `from -> to` and `to -> from` are walkable.
    Undirected,
}

impl EdgeKind {
    pub fn is_directed(&self) -> bool {
        matches!(self, Self::Directed)
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Directed => "directed",
            Self::Undirected => "undirected",
        };
        write!(f, "{}", s)
    }
}

/// A weighted edge as it was inserted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(from: VertexId, to: VertexId, weight: f64, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            weight,
            kind,
        }
    }

    /// Returns the endpoints ordered as `(min, max)`.
    pub fn canonical(&self) -> (VertexId, VertexId) {
        (self.from.min(self.to), self.from.max(self.to))
    }
}

/// One entry of a vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    /// The vertex reached by this entry.
    pub vertex: VertexId,

    /// Weight of the edge leading to it.
    pub weight: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_orders_endpoints() {
        let edge = Edge::new(5, 2, 1.5, EdgeKind::Undirected);
        assert_eq!(edge.canonical(), (2, 5));
        assert_eq!(EdgeKind::Directed.to_string(), "directed");
        assert!(!edge.kind.is_directed());
    }
}
