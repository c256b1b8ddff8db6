//! Trellis Graph - weighted graph analysis
//!
//! This crate holds a weighted graph store and the analyses that run over
//! it: shortest paths, spanning trees, critical edges, betweenness,
//! connectivity, ranking, and community detection. A small bipartite
//! recommender lives alongside it.
//!
//! # Architecture
//!
//! [`GraphStore`] keeps a sparse adjacency list indexed by dense vertex ids.
//! Every analysis is an `impl GraphStore` block in its own module and only
//! reads the store, so results are plain values owned by the caller.
//! Unreachable vertices show up as values (`None`, infinite distances,
//! `unreached` lists), never as errors.
//!
//! # Example
//!
//! ```
//! use trellis_graph::GraphStore;
//!
//! let mut graph = GraphStore::new();
//! graph.add_vertices(3);
//! graph.add_undirected_edge(0, 1, 4.0)?;
//! graph.add_undirected_edge(1, 2, 1.0)?;
//!
//! let path = graph.shortest_path(0, 2)?.expect("connected");
//! assert_eq!(path.vertices, vec![0, 1, 2]);
//! assert_eq!(path.cost, 5.0);
//! # Ok::<(), trellis_graph::GraphError>(())
//! ```

mod betweenness;
mod bridges;
mod community;
mod config;
mod edge;
mod error;
mod graph;
mod grid;
mod pathfinding;
mod ranking;
mod recommend;
mod spanning_tree;
mod traversal;

pub use betweenness::{EdgeBetweenness, EdgeScore};
pub use bridges::Bridge;
pub use community::{CommunityConfig, CommunityLabels};
pub use config::AnalysisConfig;
pub use edge::{Edge, EdgeKind, Neighbor};
pub use error::{ConfigError, GraphError, Result, VertexClass};
pub use graph::{AdjacencyMatrix, GraphStats, GraphStore, VertexId};
pub use grid::{Cell, GridMap, GridPath};
pub use pathfinding::{Path, ShortestPaths};
pub use ranking::{DegreeScore, PageRank, PageRankConfig};
pub use recommend::{ItemId, Recommendation, Recommender, UserId};
pub use spanning_tree::{SpanningTree, TreeEdge};
pub use traversal::{Components, DepthFirstEvents, DfsEvent, TraversalOrder};
