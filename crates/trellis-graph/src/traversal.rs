//! Breadth-first and depth-first traversal primitives.
//!
//! Everything here walks adjacency lists in insertion order, so results are
//! fully deterministic for a given store. The depth-first walk keeps its own
//! frame stack instead of recursing, which keeps long chains from exhausting
//! the call stack.

use crate::error::Result;
use crate::graph::{GraphStore, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::ops::ControlFlow;

/// Frontier discipline for a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// FIFO queue.
    BreadthFirst,
    /// Explicit stack, preorder.
    DepthFirst,
}

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsEvent {
    /// `vertex` was reached for the first time through a tree edge from
    /// `parent` (`None` for the root of a DFS tree).
    Discover {
        vertex: VertexId,
        parent: Option<VertexId>,
        depth: usize,
    },

    /// An adjacency entry `from -> to` whose target was already discovered.
    NonTreeEdge { from: VertexId, to: VertexId },

    /// Every adjacency entry of `vertex` has been examined.
    Finish {
        vertex: VertexId,
        parent: Option<VertexId>,
    },
}

#[derive(Debug)]
struct Frame {
    vertex: VertexId,
    parent: Option<VertexId>,
    next: usize,
    parent_skipped: bool,
}

impl Frame {
    fn new(vertex: VertexId, parent: Option<VertexId>) -> Self {
        Self {
            vertex,
            parent,
            next: 0,
            parent_skipped: false,
        }
    }
}

/// Iterator over the events of a depth-first walk.
///
/// The single adjacency entry that leads straight back to the tree parent is
/// skipped, so for undirected graphs `NonTreeEdge` only reports genuine back
/// edges (including parallel copies of the tree edge).
#[derive(Debug)]
pub struct DepthFirstEvents<'a> {
    graph: &'a GraphStore,
    visited: Vec<bool>,
    stack: Vec<Frame>,
    /// Next candidate root when sweeping the whole vertex set.
    next_root: usize,
    sweep: bool,
}

impl<'a> DepthFirstEvents<'a> {
    fn sweep(graph: &'a GraphStore) -> Self {
        Self {
            graph,
            visited: vec![false; graph.vertex_count()],
            stack: Vec::new(),
            next_root: 0,
            sweep: true,
        }
    }

    fn from_root(graph: &'a GraphStore, root: VertexId) -> Self {
        Self {
            graph,
            visited: vec![false; graph.vertex_count()],
            stack: Vec::new(),
            next_root: root,
            sweep: false,
        }
    }

    fn start_tree(&mut self, root: VertexId) -> DfsEvent {
        self.visited[root] = true;
        self.stack.push(Frame::new(root, None));
        DfsEvent::Discover {
            vertex: root,
            parent: None,
            depth: 0,
        }
    }
}

impl Iterator for DepthFirstEvents<'_> {
    type Item = DfsEvent;

    fn next(&mut self) -> Option<DfsEvent> {
        loop {
            let Some(frame) = self.stack.last_mut() else {
                if !self.sweep {
                    // Single-root walk: emit the root once, then stop.
                    if self.next_root == usize::MAX {
                        return None;
                    }
                    let root = self.next_root;
                    self.next_root = usize::MAX;
                    return Some(self.start_tree(root));
                }
                while self.next_root < self.visited.len() && self.visited[self.next_root] {
                    self.next_root += 1;
                }
                if self.next_root >= self.visited.len() {
                    return None;
                }
                return Some(self.start_tree(self.next_root));
            };

            let adjacency = self.graph.adjacent(frame.vertex);
            if frame.next < adjacency.len() {
                let to = adjacency[frame.next].vertex;
                frame.next += 1;

                if !frame.parent_skipped && frame.parent == Some(to) {
                    frame.parent_skipped = true;
                    continue;
                }

                let from = frame.vertex;
                if self.visited[to] {
                    return Some(DfsEvent::NonTreeEdge { from, to });
                }

                self.visited[to] = true;
                let depth = self.stack.len();
                self.stack.push(Frame::new(to, Some(from)));
                return Some(DfsEvent::Discover {
                    vertex: to,
                    parent: Some(from),
                    depth,
                });
            }

            let done = self.stack.pop()?;
            return Some(DfsEvent::Finish {
                vertex: done.vertex,
                parent: done.parent,
            });
        }
    }
}

/// Connected components in root-discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Components {
    components: Vec<Vec<VertexId>>,
    /// Component index per vertex.
    membership: Vec<usize>,
}

impl Components {
    /// Number of components.
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of the component containing `v`.
    pub fn component_of(&self, v: VertexId) -> Option<usize> {
        self.membership.get(v).copied()
    }

    /// Returns true if both vertices share a component.
    pub fn connected(&self, u: VertexId, v: VertexId) -> bool {
        match (self.component_of(u), self.component_of(v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Iterates over components; each lists its vertices in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &[VertexId]> {
        self.components.iter().map(Vec::as_slice)
    }

    /// The component with the most vertices (earliest one on ties).
    pub fn largest(&self) -> Option<&[VertexId]> {
        self.components
            .iter()
            .rev()
            .max_by_key(|c| c.len())
            .map(Vec::as_slice)
    }

    pub fn into_inner(self) -> Vec<Vec<VertexId>> {
        self.components
    }
}

impl GraphStore {
    /// Walks the vertices reachable from `start`.
    ///
    /// `visit` receives each vertex with its hop depth in the traversal tree
    /// and may return `ControlFlow::Break` to stop early.
    pub fn traverse<F>(&self, start: VertexId, order: TraversalOrder, mut visit: F) -> Result<()>
    where
        F: FnMut(VertexId, usize) -> ControlFlow<()>,
    {
        self.check_vertex(start)?;
        match order {
            TraversalOrder::BreadthFirst => {
                let mut visited = vec![false; self.vertex_count()];
                let _ = self.breadth_first(start, &mut visited, &mut visit);
            }
            TraversalOrder::DepthFirst => {
                for event in DepthFirstEvents::from_root(self, start) {
                    if let DfsEvent::Discover { vertex, depth, .. } = event {
                        if visit(vertex, depth).is_break() {
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Vertices reachable from `start` in BFS order.
    pub fn bfs_order(&self, start: VertexId) -> Result<Vec<VertexId>> {
        self.collect_order(start, TraversalOrder::BreadthFirst)
    }

    /// Vertices reachable from `start` in DFS preorder.
    pub fn dfs_order(&self, start: VertexId) -> Result<Vec<VertexId>> {
        self.collect_order(start, TraversalOrder::DepthFirst)
    }

    /// Depth-first events over the whole graph, starting a new tree at each
    /// undiscovered vertex in id order.
    pub fn depth_first_events(&self) -> DepthFirstEvents<'_> {
        DepthFirstEvents::sweep(self)
    }

    /// Splits the graph into connected components.
    ///
    /// Vertices are scanned in id order; each undiscovered vertex roots a new
    /// component whose members are listed in traversal discovery order.
    /// Edges are followed as stored, so directed edges only connect forward.
    pub fn connected_components(&self, order: TraversalOrder) -> Components {
        let n = self.vertex_count();
        let mut components: Vec<Vec<VertexId>> = Vec::new();
        let mut membership = vec![0; n];

        match order {
            TraversalOrder::BreadthFirst => {
                let mut visited = vec![false; n];
                for root in 0..n {
                    if visited[root] {
                        continue;
                    }
                    let mut component = Vec::new();
                    let _ = self.breadth_first(root, &mut visited, &mut |v, _| {
                        component.push(v);
                        ControlFlow::Continue(())
                    });
                    components.push(component);
                }
            }
            TraversalOrder::DepthFirst => {
                for event in self.depth_first_events() {
                    if let DfsEvent::Discover { vertex, parent, .. } = event {
                        if parent.is_none() {
                            components.push(Vec::new());
                        }
                        if let Some(current) = components.last_mut() {
                            current.push(vertex);
                        }
                    }
                }
            }
        }

        for (index, component) in components.iter().enumerate() {
            for &v in component {
                membership[v] = index;
            }
        }

        Components {
            components,
            membership,
        }
    }

    fn collect_order(&self, start: VertexId, order: TraversalOrder) -> Result<Vec<VertexId>> {
        let mut out = Vec::new();
        self.traverse(start, order, |v, _| {
            out.push(v);
            ControlFlow::Continue(())
        })?;
        Ok(out)
    }

    /// BFS from `start`, sharing `visited` with the caller.
    fn breadth_first<F>(
        &self,
        start: VertexId,
        visited: &mut [bool],
        visit: &mut F,
    ) -> ControlFlow<()>
    where
        F: FnMut(VertexId, usize) -> ControlFlow<()>,
    {
        let mut queue: VecDeque<(VertexId, usize)> = VecDeque::new();
        visited[start] = true;
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            visit(current, depth)?;
            for n in self.adjacent(current) {
                if !visited[n.vertex] {
                    visited[n.vertex] = true;
                    queue.push_back((n.vertex, depth + 1));
                }
            }
        }
        ControlFlow::Continue(())
    }
}
