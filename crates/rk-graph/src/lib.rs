//! Graph Decomposition Toolkit
//!
//! This crate provides:
//! - Graph capability traits over a dense vertex index domain
//! - An iterative depth-first search engine with an event visitor
//! - Biconnected components and articulation points of undirected graphs
//! - Strongly connected components of directed graphs (recursive and iterative)
//! - Uuid-keyed dependency and constraint networks for the modeling kernel

pub mod biconnected;
pub mod config;
pub mod dfs;
pub mod graph;
pub mod network;
pub mod scc;

// Re-exports for convenience
pub use biconnected::{
    BiconnectedComponents, BlockDecomposition, BlockVisitor, Edge, biconnected_components,
    biconnected_decomposition,
};
pub use config::{DEFAULT_RECURSION_LIMIT, DecompositionConfig, SccStrategy};
pub use dfs::{Color, DepthFirstSearch, DfsEvent, DfsVisitor, EventLog, depth_first_search};
pub use graph::{
    AdjacencyGraph, Arc, ArcId, DirectedGraph, Graph, GraphError, GraphResult, UndirectedGraph,
    VertexIndex,
};
pub use network::{ConstraintNetwork, DependencyNetwork, NetworkError, NetworkResult};
pub use scc::{
    ComponentPartition, ComponentVisitor, StrongComponents, strong_component_partition,
    strong_components, strong_components_recursive, strong_components_with,
};
