//! Edge betweenness centrality.
//!
//! [`GraphStore::edge_betweenness`] counts shortest paths with a plain BFS
//! and ignores edge weights, so on a weighted graph it ranks edges by hop
//! distance only. [`GraphStore::weighted_edge_betweenness`] is the
//! Dijkstra-driven counterpart. Both return raw totals summed over every
//! source vertex, without normalization.

use crate::graph::{GraphStore, VertexId};
use crate::pathfinding::StableQueue;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;
use tracing::debug;

/// Relative tolerance for treating two weighted path lengths as equal.
const EQUAL_PATH_EPSILON: f64 = 1e-9;

/// Betweenness of one undirected edge, keyed `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeScore {
    pub u: VertexId,
    pub v: VertexId,
    pub score: f64,
}

/// Edge betweenness scores ordered by edge key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeBetweenness {
    scores: Vec<EdgeScore>,
    pub duration_ms: u64,
}

impl EdgeBetweenness {
    fn from_map(map: BTreeMap<(VertexId, VertexId), f64>, started: Instant) -> Self {
        let scores = map
            .into_iter()
            .map(|((u, v), score)| EdgeScore { u, v, score })
            .collect();
        Self {
            scores,
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Score of the edge between `a` and `b`, in either order.
    pub fn score(&self, a: VertexId, b: VertexId) -> Option<f64> {
        let key = (a.min(b), a.max(b));
        self.scores
            .binary_search_by(|s| (s.u, s.v).cmp(&key))
            .ok()
            .map(|i| self.scores[i].score)
    }

    /// Scores in edge-key order.
    pub fn iter(&self) -> impl Iterator<Item = &EdgeScore> {
        self.scores.iter()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest scores first; equal scores keep edge-key order.
    pub fn ranked(&self) -> Vec<EdgeScore> {
        let mut ranked = self.scores.clone();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }
}

/// Per-source shortest-path DAG: settle order, path counts, predecessors.
struct PathDag {
    order: Vec<VertexId>,
    sigma: Vec<f64>,
    predecessors: Vec<Vec<VertexId>>,
}

impl PathDag {
    fn new(n: usize, source: VertexId) -> Self {
        let mut sigma = vec![0.0; n];
        sigma[source] = 1.0;
        Self {
            order: Vec::with_capacity(n),
            sigma,
            predecessors: vec![Vec::new(); n],
        }
    }

    /// Walks the DAG in reverse settle order (decreasing distance),
    /// accumulating dependencies onto edge totals.
    fn accumulate(self, totals: &mut BTreeMap<(VertexId, VertexId), f64>) {
        let mut delta = vec![0.0_f64; self.sigma.len()];
        for &v in self.order.iter().rev() {
            for &p in &self.predecessors[v] {
                delta[p] += self.sigma[p] / self.sigma[v] * (1.0 + delta[v]);
                *totals.entry((p.min(v), p.max(v))).or_default() += delta[v];
            }
        }
    }
}

impl GraphStore {
    /// Edge betweenness from unweighted shortest paths.
    ///
    /// Every edge is treated as one hop regardless of its weight. For each
    /// source, the dependency of a predecessor `p` of `v` grows by
    /// `sigma[p] / sigma[v] * (1 + delta[v])` and the edge `(p, v)` accrues
    /// `delta[v]`.
    pub fn edge_betweenness(&self) -> EdgeBetweenness {
        let started = Instant::now();
        let mut totals = self.edge_keys();

        for source in 0..self.vertex_count() {
            self.hop_dag(source).accumulate(&mut totals);
        }

        let result = EdgeBetweenness::from_map(totals, started);
        debug!(
            edges = result.len(),
            duration_ms = result.duration_ms,
            "edge betweenness computed"
        );
        result
    }

    /// Edge betweenness from weighted (Dijkstra) shortest paths.
    ///
    /// Same accumulation as [`GraphStore::edge_betweenness`]; two routes
    /// count as equally short when their lengths agree within a relative
    /// tolerance.
    pub fn weighted_edge_betweenness(&self) -> EdgeBetweenness {
        let started = Instant::now();
        let mut totals = self.edge_keys();

        for source in 0..self.vertex_count() {
            self.weighted_dag(source).accumulate(&mut totals);
        }

        let result = EdgeBetweenness::from_map(totals, started);
        debug!(
            edges = result.len(),
            duration_ms = result.duration_ms,
            "weighted edge betweenness computed"
        );
        result
    }

    /// Every edge starts at zero so edges off all shortest paths still appear.
    fn edge_keys(&self) -> BTreeMap<(VertexId, VertexId), f64> {
        self.edges().map(|e| (e.canonical(), 0.0)).collect()
    }

    fn hop_dag(&self, source: VertexId) -> PathDag {
        let n = self.vertex_count();
        let mut dag = PathDag::new(n, source);
        let mut hops: Vec<Option<usize>> = vec![None; n];
        let mut queue = VecDeque::new();

        hops[source] = Some(0);
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            dag.order.push(v);
            let next_hop = hops[v].map(|h| h + 1);
            for entry in self.adjacent(v) {
                let w = entry.vertex;
                if hops[w].is_none() {
                    hops[w] = next_hop;
                    queue.push_back(w);
                }
                if hops[w] == next_hop {
                    dag.sigma[w] += dag.sigma[v];
                    dag.predecessors[w].push(v);
                }
            }
        }
        dag
    }

    /// Equal-length ties are settled by hop count: an edge whose end lies
    /// no farther than its start (a zero-length edge, say) is kept only when
    /// it also adds a hop on a fewest-hops route. The DAG then stays acyclic
    /// even when zero-weight edges join vertices at the same distance.
    fn weighted_dag(&self, source: VertexId) -> PathDag {
        let n = self.vertex_count();
        let dist = self.weighted_distances(source);

        // Fewest hops from `source` using only edges that lie on a shortest route.
        let mut hops = vec![usize::MAX; n];
        let mut queue = VecDeque::new();
        hops[source] = 0;
        queue.push_back(source);
        while let Some(v) = queue.pop_front() {
            for entry in self.adjacent(v) {
                let w = entry.vertex;
                if hops[w] == usize::MAX && on_shortest_route(dist[v], entry.weight, dist[w]) {
                    hops[w] = hops[v] + 1;
                    queue.push_back(w);
                }
            }
        }

        let mut dag = PathDag::new(n, source);
        let mut successors: Vec<Vec<VertexId>> = vec![Vec::new(); n];
        let mut pending = vec![0_usize; n];
        for v in (0..n).filter(|&v| hops[v] != usize::MAX) {
            for entry in self.adjacent(v) {
                let w = entry.vertex;
                if hops[w] == usize::MAX || !on_shortest_route(dist[v], entry.weight, dist[w]) {
                    continue;
                }
                let farther = dist[w] - dist[v] > EQUAL_PATH_EPSILON * dist[w].max(1.0);
                if farther || hops[v] < hops[w] {
                    successors[v].push(w);
                    dag.predecessors[w].push(v);
                    pending[w] += 1;
                }
            }
        }

        // Kahn's order: every predecessor is placed before its successors.
        let mut ready = VecDeque::from([source]);
        while let Some(v) = ready.pop_front() {
            dag.order.push(v);
            for &w in &successors[v] {
                dag.sigma[w] += dag.sigma[v];
                pending[w] -= 1;
                if pending[w] == 0 {
                    ready.push_back(w);
                }
            }
        }
        dag
    }

    /// Plain Dijkstra distances from `source`.
    fn weighted_distances(&self, source: VertexId) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; self.vertex_count()];
        let mut queue = StableQueue::default();
        dist[source] = 0.0;
        queue.push(source, 0.0, 0.0);

        while let Some((v, d)) = queue.pop() {
            if d > dist[v] {
                continue;
            }
            for entry in self.adjacent(v) {
                let candidate = d + entry.weight;
                if candidate < dist[entry.vertex] {
                    dist[entry.vertex] = candidate;
                    queue.push(entry.vertex, candidate, candidate);
                }
            }
        }
        dist
    }
}

/// Whether stepping from a vertex at `from` over `weight` reaches `to`
/// along a shortest route, within the relative tolerance.
fn on_shortest_route(from: f64, weight: f64, to: f64) -> bool {
    let candidate = from + weight;
    (candidate - to).abs() <= EQUAL_PATH_EPSILON * candidate.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn undirected(n: usize, edges: &[(usize, usize, f64)]) -> GraphStore {
        let mut graph = GraphStore::new();
        graph.add_vertices(n);
        for &(u, v, w) in edges {
            graph.add_undirected_edge(u, v, w).unwrap();
        }
        graph
    }

    #[test]
    fn test_path_graph_scores() {
        // 0 - 1 - 2
        let graph = undirected(3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let result = graph.edge_betweenness();
        // From 0: delta[1] = 1 goes to (0,1), delta[2] = 0 to (1,2).
        // From 2: symmetric. From 1: both leaves have delta 0.
        assert_eq!(result.score(0, 1), Some(1.0));
        assert_eq!(result.score(2, 1), Some(1.0));
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_star_center_edges_rank_equal() {
        let graph = undirected(4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let result = graph.edge_betweenness();
        // From leaf 1: delta[0] = 2, accrued by edge (0,1).
        // Every edge gets that once from its own leaf.
        for leaf in 1..4 {
            assert_eq!(result.score(0, leaf), Some(2.0));
        }
    }

    #[test]
    fn test_bridge_edge_is_top_bottleneck() {
        // Two triangles joined by 2-3.
        let graph = undirected(
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (0, 2, 1.0),
                (2, 3, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (3, 5, 1.0),
            ],
        );
        let ranked = graph.edge_betweenness().ranked();
        assert_eq!((ranked[0].u, ranked[0].v), (2, 3));
    }

    fn shortcut(weight: f64) -> GraphStore {
        // 0 - 1 - 2 - 3 plus a direct 0-2 edge of the given weight.
        undirected(4, &[(0, 1, 1.0), (1, 2, 1.0), (0, 2, weight), (2, 3, 1.0)])
    }

    #[test]
    fn test_weights_ignored_by_default() {
        let light: Vec<EdgeScore> = shortcut(1.0).edge_betweenness().iter().copied().collect();
        let heavy: Vec<EdgeScore> = shortcut(50.0).edge_betweenness().iter().copied().collect();
        assert_eq!(light, heavy);
    }

    #[test]
    fn test_weighted_variant_respects_weights() {
        // The direct 0-2 edge is so heavy that no weighted shortest path uses it.
        let graph = shortcut(50.0);
        let weighted = graph.weighted_edge_betweenness();
        assert_eq!(weighted.score(0, 2), Some(0.0));
        assert!(weighted.score(0, 1).unwrap() > 0.0);
        assert!(graph.edge_betweenness().score(0, 2).unwrap() > 0.0);
    }

    #[test]
    fn test_weighted_matches_unweighted_on_unit_weights() {
        let graph = undirected(
            5,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0), (2, 4, 1.0)],
        );
        let plain = graph.edge_betweenness();
        let weighted = graph.weighted_edge_betweenness();
        for (a, b) in plain.iter().zip(weighted.iter()) {
            assert_eq!((a.u, a.v), (b.u, b.v));
            assert!((a.score - b.score).abs() < 1e-9);
        }
    }

    #[test]
    fn test_diamond_splits_tied_paths() {
        // Two shortest routes between 0 and 3, and between 1 and 2.
        let graph = undirected(4, &[(0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0)]);
        for result in [graph.edge_betweenness(), graph.weighted_edge_betweenness()] {
            assert_eq!(result.len(), 4);
            for edge in result.iter() {
                assert_eq!(edge.score, 1.0, "edge ({}, {})", edge.u, edge.v);
            }
        }
    }

    #[test]
    fn test_zero_weight_edge_scores_symmetric() {
        // Swapping 1 and 2 maps the graph onto itself.
        let graph = undirected(3, &[(0, 2, 1.0), (0, 1, 1.0), (1, 2, 0.0)]);
        let result = graph.weighted_edge_betweenness();
        assert_eq!(result.score(0, 1), result.score(0, 2));
        assert_eq!(result.score(0, 1), Some(0.0));
        // From 1, the route to 0 through 2 ties the direct one; likewise from 2.
        assert_eq!(result.score(1, 2), Some(1.0));
    }

    #[test]
    fn test_zero_weight_cycle_terminates() {
        let graph = undirected(3, &[(0, 1, 0.0), (1, 2, 0.0), (2, 0, 0.0)]);
        let result = graph.weighted_edge_betweenness();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|e| e.score.is_finite()));
    }

    #[test]
    fn test_empty_graph() {
        assert!(GraphStore::new().edge_betweenness().is_empty());
    }
}
