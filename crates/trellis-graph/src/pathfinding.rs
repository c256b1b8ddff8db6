//! Single-source shortest paths: Dijkstra and A*.
//!
//! Both run on the same priority-driven search. The heap is a min-heap on
//! priority with FIFO order among equal priorities, and superseded heap
//! entries are skipped when popped instead of being removed eagerly.

use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, VertexId};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

// ── Search core ─────────────────────────────────────────────────────────────

/// Anything the best-first search can walk: dense node indexes with
/// non-negative weighted successors.
pub(crate) trait SearchSpace {
    fn node_count(&self) -> usize;

    fn for_each_successor<F: FnMut(usize, f64)>(&self, node: usize, visit: F);
}

impl SearchSpace for GraphStore {
    fn node_count(&self) -> usize {
        self.vertex_count()
    }

    fn for_each_successor<F: FnMut(usize, f64)>(&self, node: usize, mut visit: F) {
        for n in self.adjacent(node) {
            visit(n.vertex, n.weight);
        }
    }
}

#[derive(Debug)]
struct HeapEntry {
    priority: f64,
    seq: u64,
    node: usize,
    cost: f64,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on priority, then on insertion sequence
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-priority queue with FIFO tie-breaking.
#[derive(Debug, Default)]
pub(crate) struct StableQueue {
    heap: BinaryHeap<HeapEntry>,
    seq: u64,
}

impl StableQueue {
    pub(crate) fn push(&mut self, node: usize, priority: f64, cost: f64) {
        self.heap.push(HeapEntry {
            priority,
            seq: self.seq,
            node,
            cost,
        });
        self.seq += 1;
    }

    /// Pops `(node, cost)` of the lowest-priority entry.
    pub(crate) fn pop(&mut self) -> Option<(usize, f64)> {
        self.heap.pop().map(|e| (e.node, e.cost))
    }
}

/// Tentative distances and predecessors left by a search.
#[derive(Debug)]
pub(crate) struct SearchState {
    pub(crate) dist: Vec<f64>,
    pub(crate) pred: Vec<Option<usize>>,
    pub(crate) settled: usize,
}

impl SearchState {
    /// Walks predecessors back from `goal`. `None` if `goal` was not reached.
    pub(crate) fn trace(&self, goal: usize) -> Option<Vec<usize>> {
        if !self.dist[goal].is_finite() {
            return None;
        }
        let mut path = vec![goal];
        let mut current = goal;
        while let Some(prev) = self.pred[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Best-first search from `start` ordered by `cost + heuristic(node)`.
///
/// With `goal` set the search stops as soon as the goal is popped. A zero
/// heuristic turns this into Dijkstra.
pub(crate) fn best_first<S, H>(
    space: &S,
    start: usize,
    goal: Option<usize>,
    heuristic: H,
) -> SearchState
where
    S: SearchSpace + ?Sized,
    H: Fn(usize) -> f64,
{
    let n = space.node_count();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred: Vec<Option<usize>> = vec![None; n];
    let mut queue = StableQueue::default();
    let mut settled = 0;

    dist[start] = 0.0;
    queue.push(start, heuristic(start), 0.0);

    while let Some((node, cost)) = queue.pop() {
        if cost > dist[node] {
            continue; // stale entry
        }
        settled += 1;
        if goal == Some(node) {
            break;
        }

        space.for_each_successor(node, |next, weight| {
            let candidate = cost + weight;
            if candidate < dist[next] {
                dist[next] = candidate;
                pred[next] = Some(node);
                queue.push(next, candidate + heuristic(next), candidate);
            }
        });
    }

    SearchState {
        dist,
        pred,
        settled,
    }
}

// ── Public results ──────────────────────────────────────────────────────────

/// A route and its total weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub vertices: Vec<VertexId>,
    pub cost: f64,
}

/// Distances from one source to every vertex.
///
/// Unreached vertices keep an infinite distance and no predecessor; that is
/// a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPaths {
    pub source: VertexId,
    pub distances: Vec<f64>,
    pub predecessors: Vec<Option<VertexId>>,
}

impl ShortestPaths {
    /// Distance to `v`, or `None` if it is unreachable or out of range.
    pub fn distance(&self, v: VertexId) -> Option<f64> {
        self.distances.get(v).copied().filter(|d| d.is_finite())
    }

    pub fn is_reachable(&self, v: VertexId) -> bool {
        self.distance(v).is_some()
    }

    /// Vertices from the source to `v`, or `None` if unreachable.
    pub fn path_to(&self, v: VertexId) -> Option<Vec<VertexId>> {
        self.distance(v)?;
        let mut path = vec![v];
        let mut current = v;
        while let Some(prev) = self.predecessors[current] {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

impl GraphStore {
    /// Runs Dijkstra from `start` over the whole graph.
    ///
    /// Weights are guaranteed non-negative by [`GraphStore::add_edge`].
    pub fn shortest_paths(&self, start: VertexId) -> Result<ShortestPaths> {
        self.check_vertex(start)?;
        let state = best_first(self, start, None, |_| 0.0);

        debug!(source = start, settled = state.settled, "dijkstra finished");

        Ok(ShortestPaths {
            source: start,
            distances: state.dist,
            predecessors: state.pred,
        })
    }

    /// Finds the cheapest route between two vertices.
    ///
    /// Dijkstra that stops once `goal` is settled. `Ok(None)` means no route.
    pub fn shortest_path(&self, start: VertexId, goal: VertexId) -> Result<Option<Path>> {
        self.check_vertex(start)?;
        self.check_vertex(goal)?;
        let state = best_first(self, start, Some(goal), |_| 0.0);
        Ok(state.trace(goal).map(|vertices| Path {
            vertices,
            cost: state.dist[goal],
        }))
    }

    /// A* search guided by a caller-supplied per-vertex heuristic.
    ///
    /// The heuristic is trusted: if it overestimates the remaining cost the
    /// returned path may be suboptimal. It must have one entry per vertex.
    pub fn astar(
        &self,
        start: VertexId,
        goal: VertexId,
        heuristic: &[f64],
    ) -> Result<Option<Path>> {
        self.check_vertex(start)?;
        self.check_vertex(goal)?;
        if heuristic.len() != self.vertex_count() {
            return Err(GraphError::HeuristicLength {
                expected: self.vertex_count(),
                actual: heuristic.len(),
            });
        }

        let state = best_first(self, start, Some(goal), |v| heuristic[v]);
        debug!(start, goal, settled = state.settled, "a* finished");

        Ok(state.trace(goal).map(|vertices| Path {
            vertices,
            cost: state.dist[goal],
        }))
    }
}
