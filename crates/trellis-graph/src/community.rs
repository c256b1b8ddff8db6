//! Community detection by label propagation.

use crate::graph::{GraphStore, VertexId};
use crate::traversal::TraversalOrder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};

/// Label propagation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommunityConfig {
    /// Upper bound on propagation rounds.
    pub max_rounds: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self { max_rounds: 100 }
    }
}

/// Final labels of a label propagation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityLabels {
    /// Label of each vertex, indexed by vertex id.
    pub labels: Vec<VertexId>,
    pub rounds: usize,
    /// False when the round cap stopped the run.
    pub converged: bool,
}

impl CommunityLabels {
    pub fn label_of(&self, v: VertexId) -> Option<VertexId> {
        self.labels.get(v).copied()
    }

    pub fn community_count(&self) -> usize {
        self.communities().len()
    }

    /// Members grouped by label, groups ordered by their first member.
    pub fn communities(&self) -> Vec<Vec<VertexId>> {
        let mut slot: BTreeMap<VertexId, usize> = BTreeMap::new();
        let mut groups: Vec<Vec<VertexId>> = Vec::new();
        for (v, &label) in self.labels.iter().enumerate() {
            let index = *slot.entry(label).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[index].push(v);
        }
        groups
    }
}

impl GraphStore {
    /// Runs weighted label propagation for at most `max_rounds` rounds.
    ///
    /// Every vertex starts with its own id as label. A round visits vertices
    /// in id order and updates labels in place: a vertex adopts the
    /// neighbouring label with the largest summed edge weight, but only when
    /// that total strictly beats the total for its current label. Among
    /// equally heavy new labels the first one met in adjacency order wins.
    ///
    /// Stops after a round without changes, or at the cap with
    /// `converged == false`.
    pub fn label_propagation(&self, max_rounds: usize) -> CommunityLabels {
        let n = self.vertex_count();
        let mut labels: Vec<VertexId> = (0..n).collect();
        let mut tally: Vec<(VertexId, f64)> = Vec::new();
        let mut slot: HashMap<VertexId, usize> = HashMap::new();
        let mut rounds = 0;
        let mut converged = false;

        while rounds < max_rounds {
            rounds += 1;
            let mut changed = false;

            for v in 0..n {
                // Labels in first-seen order, indexed by `slot`.
                tally.clear();
                slot.clear();
                for entry in self.adjacent(v) {
                    let label = labels[entry.vertex];
                    let index = *slot.entry(label).or_insert_with(|| {
                        tally.push((label, 0.0));
                        tally.len() - 1
                    });
                    tally[index].1 += entry.weight;
                }

                let current = labels[v];
                let mut best = current;
                let mut best_weight = slot.get(&current).map_or(0.0, |&i| tally[i].1);
                for &(label, weight) in &tally {
                    if weight > best_weight {
                        best = label;
                        best_weight = weight;
                    }
                }

                if best != current {
                    labels[v] = best;
                    changed = true;
                }
            }

            if !changed {
                converged = true;
                break;
            }
        }

        if !converged && n > 0 {
            warn!(max_rounds, "label propagation hit the round cap without converging");
        }

        let result = CommunityLabels {
            labels,
            rounds,
            converged,
        };
        debug!(
            rounds,
            converged,
            communities = result.community_count(),
            "label propagation finished"
        );
        result
    }

    /// Groups vertices by connected component (breadth-first discovery).
    pub fn component_communities(&self) -> Vec<Vec<VertexId>> {
        self.connected_components(TraversalOrder::BreadthFirst).into_inner()
    }
}
