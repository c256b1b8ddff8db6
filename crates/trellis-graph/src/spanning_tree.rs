//! Minimum spanning trees (Prim).

use crate::error::Result;
use crate::graph::{GraphStore, VertexId};
use crate::pathfinding::StableQueue;
use crate::traversal::TraversalOrder;
use serde::Serialize;
use tracing::{debug, warn};

/// An edge attaching `child` to the tree through `parent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeEdge {
    pub parent: VertexId,
    pub child: VertexId,
    pub weight: f64,
}

/// A minimum spanning tree grown from `root`.
///
/// Vertices that cannot be reached from the root are listed in `unreached`
/// and have no tree edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTree {
    pub root: VertexId,
    /// Tree edges ordered by child id.
    pub edges: Vec<TreeEdge>,
    pub total_weight: f64,
    pub unreached: Vec<VertexId>,
}

impl SpanningTree {
    /// True when every vertex of the graph is in the tree.
    pub fn is_spanning(&self) -> bool {
        self.unreached.is_empty()
    }

    /// Tree parent of `v`, `None` for the root and unreached vertices.
    pub fn parent_of(&self, v: VertexId) -> Option<VertexId> {
        self.edges.iter().find(|e| e.child == v).map(|e| e.parent)
    }
}

impl GraphStore {
    /// Builds a minimum spanning tree with Prim's algorithm.
    ///
    /// The graph is assumed connected. When it is not, vertices outside the
    /// root's component are left out of the tree and reported in
    /// [`SpanningTree::unreached`]; build a forest with
    /// [`GraphStore::spanning_forest`] instead.
    pub fn minimum_spanning_tree(&self, root: VertexId) -> Result<SpanningTree> {
        self.check_vertex(root)?;
        let tree = self.prim(root);

        if !tree.is_spanning() {
            warn!(
                root,
                unreached = tree.unreached.len(),
                "graph is disconnected, spanning tree is partial"
            );
        }
        Ok(tree)
    }

    /// One minimum spanning tree per connected component, each rooted at the
    /// component's smallest vertex id.
    pub fn spanning_forest(&self) -> Vec<SpanningTree> {
        let components = self.connected_components(TraversalOrder::BreadthFirst);
        let forest: Vec<SpanningTree> = components
            .iter()
            .filter_map(|members| members.iter().min().copied())
            .map(|root| {
                let mut tree = self.prim(root);
                tree.unreached.clear();
                tree
            })
            .collect();

        debug!(trees = forest.len(), "spanning forest built");
        forest
    }

    fn prim(&self, root: VertexId) -> SpanningTree {
        let n = self.vertex_count();
        let mut key = vec![f64::INFINITY; n];
        let mut parent: Vec<Option<VertexId>> = vec![None; n];
        let mut in_tree = vec![false; n];
        let mut queue = StableQueue::default();

        key[root] = 0.0;
        queue.push(root, 0.0, 0.0);

        while let Some((u, _)) = queue.pop() {
            if in_tree[u] {
                continue;
            }
            in_tree[u] = true;

            for entry in self.adjacent(u) {
                let v = entry.vertex;
                if !in_tree[v] && entry.weight < key[v] {
                    key[v] = entry.weight;
                    parent[v] = Some(u);
                    queue.push(v, entry.weight, entry.weight);
                }
            }
        }

        let mut edges = Vec::new();
        let mut unreached = Vec::new();
        for v in 0..n {
            match parent[v] {
                Some(p) if in_tree[v] => edges.push(TreeEdge {
                    parent: p,
                    child: v,
                    weight: key[v],
                }),
                _ if v == root => {}
                _ => unreached.push(v),
            }
        }
        let total_weight = edges.iter().map(|e| e.weight).sum();

        SpanningTree {
            root,
            edges,
            total_weight,
            unreached,
        }
    }
}
