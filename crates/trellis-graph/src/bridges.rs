//! Critical edge (bridge) detection via DFS low-link values.

use crate::graph::{GraphStore, VertexId};
use crate::traversal::DfsEvent;
use serde::Serialize;
use tracing::debug;

const UNVISITED: usize = usize::MAX;

/// A tree edge whose removal disconnects `to` from `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Bridge {
    pub from: VertexId,
    pub to: VertexId,
}

impl GraphStore {
    /// Finds every bridge of the graph.
    ///
    /// Meant for undirected graphs. Driven by the iterative depth-first walk
    /// from [`GraphStore::depth_first_events`], so chain length is not bounded
    /// by the call stack. A second edge between the same pair of vertices is a
    /// back edge, so parallel edges are never reported.
    ///
    /// Bridges come out in the order the DFS finishes them.
    pub fn bridges(&self) -> Vec<Bridge> {
        let n = self.vertex_count();
        let mut discovery = vec![UNVISITED; n];
        let mut low = vec![UNVISITED; n];
        let mut timer = 0;
        let mut bridges = Vec::new();

        for event in self.depth_first_events() {
            match event {
                DfsEvent::Discover { vertex, .. } => {
                    discovery[vertex] = timer;
                    low[vertex] = timer;
                    timer += 1;
                }
                DfsEvent::NonTreeEdge { from, to } => {
                    low[from] = low[from].min(discovery[to]);
                }
                DfsEvent::Finish {
                    vertex,
                    parent: Some(parent),
                } => {
                    low[parent] = low[parent].min(low[vertex]);
                    if low[vertex] > discovery[parent] {
                        bridges.push(Bridge {
                            from: parent,
                            to: vertex,
                        });
                    }
                }
                DfsEvent::Finish { parent: None, .. } => {}
            }
        }

        debug!(bridges = bridges.len(), "bridge search finished");
        bridges
    }
}
