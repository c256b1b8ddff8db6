//! Vertex ranking: PageRank power iteration and degree centrality.

use crate::error::{GraphError, Result};
use crate::graph::{GraphStore, VertexId};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

/// PageRank parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRankConfig {
    /// Probability of following an edge rather than jumping to a random vertex.
    pub damping_factor: f64,
    /// Number of power iterations. There is no early exit.
    pub iterations: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping_factor: 0.85,
            iterations: 100,
        }
    }
}

impl PageRankConfig {
    /// Rejects damping factors outside `[0, 1]`, NaN included.
    pub fn validate(&self) -> Result<()> {
        if (0.0..=1.0).contains(&self.damping_factor) {
            Ok(())
        } else {
            Err(GraphError::InvalidDamping(self.damping_factor))
        }
    }
}

/// Result of [`GraphStore::page_rank`], one score per vertex id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRank {
    pub scores: Vec<f64>,
    pub iterations: usize,
    pub duration_ms: u64,
}

impl PageRank {
    /// Sum of all scores; stays at 1.0 up to rounding.
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    pub fn score(&self, v: VertexId) -> Option<f64> {
        self.scores.get(v).copied()
    }

    /// `(vertex, score)` pairs, best first. Ties keep id order.
    pub fn ranked(&self) -> Vec<(VertexId, f64)> {
        let mut ranked: Vec<(VertexId, f64)> = self.scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Number of adjacency entries of a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DegreeScore {
    pub vertex: VertexId,
    pub degree: usize,
}

impl GraphStore {
    /// PageRank by power iteration.
    ///
    /// Each vertex splits `damping * rank` evenly over its adjacency entries,
    /// so an undirected edge carries rank both ways. A vertex with no
    /// entries spreads its share over every vertex instead.
    pub fn page_rank(&self, config: &PageRankConfig) -> Result<PageRank> {
        config.validate()?;
        let started = Instant::now();
        let n = self.vertex_count();

        if n == 0 {
            return Ok(PageRank {
                scores: Vec::new(),
                iterations: 0,
                duration_ms: 0,
            });
        }

        let d = config.damping_factor;
        let size = n as f64;
        let mut scores = vec![1.0 / size; n];
        let mut next = vec![0.0_f64; n];

        for _ in 0..config.iterations {
            let dangling: f64 = (0..n)
                .filter(|&u| self.adjacent(u).is_empty())
                .map(|u| scores[u])
                .sum();
            let base = (1.0 - d) / size + d * dangling / size;
            next.iter_mut().for_each(|s| *s = base);

            for (u, &rank) in scores.iter().enumerate() {
                let out = self.adjacent(u);
                if out.is_empty() {
                    continue;
                }
                let share = d * rank / out.len() as f64;
                for entry in out {
                    next[entry.vertex] += share;
                }
            }

            std::mem::swap(&mut scores, &mut next);
        }

        let result = PageRank {
            scores,
            iterations: config.iterations,
            duration_ms: started.elapsed().as_millis() as u64,
        };
        debug!(
            vertices = n,
            iterations = result.iterations,
            duration_ms = result.duration_ms,
            "page rank computed"
        );
        Ok(result)
    }

    /// Vertices by adjacency-list length, highest first, ties by id.
    pub fn degree_centrality(&self) -> Vec<DegreeScore> {
        let mut scores: Vec<DegreeScore> = (0..self.vertex_count())
            .map(|vertex| DegreeScore {
                vertex,
                degree: self.adjacent(vertex).len(),
            })
            .collect();
        scores.sort_by(|a, b| b.degree.cmp(&a.degree).then(a.vertex.cmp(&b.vertex)));
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn social() -> GraphStore {
        let mut graph = GraphStore::new();
        graph.add_vertices(6);
        for (u, v) in [(0, 1), (0, 2), (1, 2), (3, 4), (4, 5)] {
            graph.add_undirected_edge(u, v, 1.0).unwrap();
        }
        graph
    }

    #[test]
    fn test_page_rank_mass_is_conserved() {
        let rank = social().page_rank(&PageRankConfig::default()).unwrap();
        assert_eq!(rank.scores.len(), 6);
        assert_eq!(rank.iterations, 100);
        assert!((rank.total() - 1.0).abs() < 1e-9);
        // The centre of the 3-4-5 path outranks its ends.
        assert!(rank.score(4).unwrap() > rank.score(3).unwrap());
        assert_eq!(rank.ranked()[0].0, 4);
    }

    #[test]
    fn test_dangling_vertices_keep_mass() {
        let mut graph = GraphStore::new();
        graph.add_vertices(4);
        graph.add_directed_edge(0, 1, 1.0).unwrap();
        graph.add_directed_edge(1, 2, 1.0).unwrap();
        // 2 and 3 have no out-edges.
        let rank = graph
            .page_rank(&PageRankConfig {
                damping_factor: 0.85,
                iterations: 30,
            })
            .unwrap();
        assert!((rank.total() - 1.0).abs() < 1e-9);
        assert!(rank.score(2).unwrap() > rank.score(0).unwrap());
    }

    #[test]
    fn test_zero_damping_is_uniform() {
        let rank = social()
            .page_rank(&PageRankConfig {
                damping_factor: 0.0,
                iterations: 5,
            })
            .unwrap();
        for score in &rank.scores {
            assert!((score - 1.0 / 6.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_iterations_returns_initial_vector() {
        let rank = social()
            .page_rank(&PageRankConfig {
                damping_factor: 0.85,
                iterations: 0,
            })
            .unwrap();
        assert_eq!(rank.scores, vec![1.0 / 6.0; 6]);
    }

    #[test]
    fn test_empty_graph() {
        let rank = GraphStore::new().page_rank(&PageRankConfig::default()).unwrap();
        assert!(rank.scores.is_empty());
        assert_eq!(rank.total(), 0.0);
    }

    #[test]
    fn test_invalid_damping() {
        let graph = social();
        for damping in [-0.1, 1.5, f64::NAN] {
            let config = PageRankConfig {
                damping_factor: damping,
                iterations: 10,
            };
            assert!(matches!(
                graph.page_rank(&config),
                Err(GraphError::InvalidDamping(_))
            ));
        }
    }

    #[test]
    fn test_degree_centrality_order() {
        let scores = social().degree_centrality();
        let order: Vec<(usize, usize)> = scores.iter().map(|s| (s.vertex, s.degree)).collect();
        assert_eq!(order, vec![(0, 2), (1, 2), (2, 2), (4, 2), (3, 1), (5, 1)]);
    }
}
