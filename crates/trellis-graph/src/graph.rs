//! Core graph data structure.
//!
//! The GraphStore owns vertices and weighted edges. Every analysis in this
//! crate reads it through `&self`; only the caller building the graph
//! mutates it.

use crate::edge::{Edge, EdgeKind, Neighbor};
use crate::error::{GraphError, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::ops::Range;
use tracing::trace;

/// Dense vertex identifier in `[0, vertex_count)`.
pub type VertexId = usize;

/// A weighted graph with sparse, insertion-ordered adjacency.
///
/// Vertex ids are handed out sequentially and never reused. The adjacency
/// order of each vertex is the order in which its edges were added, which
/// every traversal in this crate relies on for deterministic results.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    /// Outgoing neighbours per vertex, in insertion order.
    adjacency: Vec<Vec<Neighbor>>,

    /// Every accepted edge, in insertion order.
    edges: Vec<Edge>,
}

impl GraphStore {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its id.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = self.adjacency.len();
        self.adjacency.push(Vec::new());
        id
    }

    /// Adds `count` vertices and returns the range of their ids.
    pub fn add_vertices(&mut self, count: usize) -> Range<VertexId> {
        let first = self.adjacency.len();
        self.adjacency.resize_with(first + count, Vec::new);
        first..first + count
    }

    /// Adds a weighted edge.
    ///
    /// Both endpoints must exist and the weight must be finite and
    /// non-negative. On error nothing is modified. For an undirected edge the
    /// reverse entry is appended to `to`'s adjacency in the same call.
    pub fn add_edge(
        &mut self,
        from: VertexId,
        to: VertexId,
        weight: f64,
        kind: EdgeKind,
    ) -> Result<()> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { from, to, weight });
        }
        if weight < 0.0 {
            return Err(GraphError::NegativeWeight { from, to, weight });
        }

        self.adjacency[from].push(Neighbor { vertex: to, weight });
        if kind == EdgeKind::Undirected {
            self.adjacency[to].push(Neighbor {
                vertex: from,
                weight,
            });
        }
        self.edges.push(Edge::new(from, to, weight, kind));

        trace!(from, to, weight, %kind, "edge added");
        Ok(())
    }

    /// Adds an edge walkable in both directions.
    pub fn add_undirected_edge(&mut self, u: VertexId, v: VertexId, weight: f64) -> Result<()> {
        self.add_edge(u, v, weight, EdgeKind::Undirected)
    }

    /// Adds an edge walkable only from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: VertexId, to: VertexId, weight: f64) -> Result<()> {
        self.add_edge(from, to, weight, EdgeKind::Directed)
    }

    /// Returns the ordered adjacency of `v`.
    pub fn neighbors(&self, v: VertexId) -> Result<&[Neighbor]> {
        self.check_vertex(v)?;
        Ok(&self.adjacency[v])
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of accepted edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter()
    }

    /// Returns true if `v` is a valid vertex id.
    pub fn contains(&self, v: VertexId) -> bool {
        v < self.adjacency.len()
    }

    /// Returns the number of adjacency entries of `v`.
    pub fn degree(&self, v: VertexId) -> Result<usize> {
        Ok(self.neighbors(v)?.len())
    }

    /// Materializes a dense matrix for O(1) pairwise weight lookup.
    ///
    /// The matrix is a snapshot; later edge insertions are not reflected.
    /// Parallel edges collapse to the lightest one.
    pub fn adjacency_matrix(&self) -> AdjacencyMatrix {
        let size = self.vertex_count();
        let mut cells = vec![None; size * size];
        for (u, list) in self.adjacency.iter().enumerate() {
            for n in list {
                let cell: &mut Option<f64> = &mut cells[u * size + n.vertex];
                *cell = Some(match *cell {
                    Some(w) => w.min(n.weight),
                    None => n.weight,
                });
            }
        }
        AdjacencyMatrix { size, cells }
    }

    /// Exports the graph as an undirected petgraph graph.
    ///
    /// Node index `i` holds vertex id `i`; each recorded edge appears once.
    pub fn to_petgraph(&self) -> UnGraph<VertexId, f64> {
        let mut graph = UnGraph::with_capacity(self.vertex_count(), self.edge_count());
        for v in 0..self.vertex_count() {
            graph.add_node(v);
        }
        for edge in &self.edges {
            graph.add_edge(NodeIndex::new(edge.from), NodeIndex::new(edge.to), edge.weight);
        }
        graph
    }

    pub(crate) fn check_vertex(&self, v: VertexId) -> Result<()> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(GraphError::invalid_vertex(v, self.vertex_count()))
        }
    }

    /// Adjacency of a vertex already known to be valid.
    pub(crate) fn adjacent(&self, v: VertexId) -> &[Neighbor] {
        &self.adjacency[v]
    }
}

/// A dense snapshot of the adjacency, indexed `[from][to]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdjacencyMatrix {
    size: usize,
    cells: Vec<Option<f64>>,
}

impl AdjacencyMatrix {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight of the edge `from -> to`, if any.
    pub fn weight(&self, from: VertexId, to: VertexId) -> Option<f64> {
        if from >= self.size || to >= self.size {
            return None;
        }
        self.cells[from * self.size + to]
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<f64>]> {
        // chunks panics on a zero size
        self.cells.chunks(self.size.max(1))
    }
}

/// Graph statistics for reporting.
#[derive(Debug, Serialize, Deserialize)]
pub struct GraphStats {
    pub vertex_count: usize,
    pub edge_count: usize,
    pub directed_edges: usize,
}

impl GraphStore {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            vertex_count: self.vertex_count(),
            edge_count: self.edge_count(),
            directed_edges: self.edges.iter().filter(|e| e.kind.is_directed()).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VertexClass;

    #[test]
    fn test_add_vertex_sequential_ids() {
        let mut graph = GraphStore::new();
        assert_eq!(graph.add_vertex(), 0);
        assert_eq!(graph.add_vertex(), 1);
        assert_eq!(graph.add_vertices(3), 2..5);
        assert_eq!(graph.vertex_count(), 5);
    }

    #[test]
    fn test_undirected_edge_appends_both_sides() {
        let mut graph = GraphStore::new();
        graph.add_vertices(3);
        graph.add_undirected_edge(0, 1, 2.0).unwrap();
        graph.add_undirected_edge(0, 2, 3.0).unwrap();

        let n0: Vec<_> = graph.neighbors(0).unwrap().iter().map(|n| n.vertex).collect();
        assert_eq!(n0, vec![1, 2]);
        assert_eq!(
            graph.neighbors(1).unwrap()[0],
            Neighbor {
                vertex: 0,
                weight: 2.0
            }
        );
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_directed_edge_one_side() {
        let mut graph = GraphStore::new();
        graph.add_vertices(2);
        graph.add_directed_edge(0, 1, 1.0).unwrap();
        assert_eq!(graph.degree(0).unwrap(), 1);
        assert_eq!(graph.degree(1).unwrap(), 0);
        assert_eq!(graph.stats().directed_edges, 1);
    }

    #[test]
    fn test_invalid_vertex_rejected_without_mutation() {
        let mut graph = GraphStore::new();
        graph.add_vertices(2);
        let err = graph.add_undirected_edge(0, 2, 1.0).unwrap_err();
        assert_eq!(
            err,
            GraphError::InvalidVertex {
                class: VertexClass::Vertex,
                id: 2,
                count: 2
            }
        );
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.neighbors(0).unwrap().is_empty());
        assert!(graph.neighbors(5).is_err());
    }

    #[test]
    fn test_bad_weights_rejected() {
        let mut graph = GraphStore::new();
        graph.add_vertices(2);
        assert!(matches!(
            graph.add_undirected_edge(0, 1, -1.0),
            Err(GraphError::NegativeWeight { .. })
        ));
        assert!(matches!(
            graph.add_undirected_edge(0, 1, f64::NAN),
            Err(GraphError::NonFiniteWeight { .. })
        ));
        assert!(matches!(
            graph.add_directed_edge(0, 1, f64::INFINITY),
            Err(GraphError::NonFiniteWeight { .. })
        ));
        assert_eq!(graph.edge_count(), 0);

        // The store is still usable afterwards
        graph.add_undirected_edge(0, 1, 0.0).unwrap();
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_adjacency_matrix_snapshot() {
        let mut graph = GraphStore::new();
        graph.add_vertices(3);
        graph.add_undirected_edge(0, 1, 4.0).unwrap();
        graph.add_undirected_edge(0, 1, 2.0).unwrap();
        graph.add_directed_edge(1, 2, 7.0).unwrap();

        let matrix = graph.adjacency_matrix();
        assert_eq!(matrix.size(), 3);
        assert_eq!(matrix.weight(0, 1), Some(2.0));
        assert_eq!(matrix.weight(1, 0), Some(2.0));
        assert_eq!(matrix.weight(1, 2), Some(7.0));
        assert_eq!(matrix.weight(2, 1), None);
        assert_eq!(matrix.weight(9, 0), None);
        assert_eq!(matrix.rows().count(), 3);
    }

    #[test]
    fn test_to_petgraph_keeps_ids() {
        let mut graph = GraphStore::new();
        graph.add_vertices(3);
        graph.add_undirected_edge(0, 2, 1.5).unwrap();
        let pg = graph.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 1);
        assert_eq!(pg[NodeIndex::new(2)], 2);
        let e = pg.find_edge(NodeIndex::new(2), NodeIndex::new(0)).unwrap();
        assert_eq!(pg[e], 1.5);
    }
}
