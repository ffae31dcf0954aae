//! Graph Capability
//!
//! Read-only graph abstractions borrowed by the decomposition algorithms,
//! plus a concrete arc-list graph for kernel code that builds its own
//! adjacency networks.

use thiserror::Error;

/// Dense vertex index in `[0, num_vertices())`
pub type VertexIndex = usize;

/// Index of an arc inside an [`AdjacencyGraph`]
pub type ArcId = usize;

/// Graph construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("Vertex {vertex} out of range (graph has {len} vertices)")]
    VertexOutOfRange { vertex: VertexIndex, len: usize },

    #[error("Self-loop on vertex {0} is not a valid undirected edge")]
    SelfLoop(VertexIndex),
}

/// Result type for graph construction
pub type GraphResult<T> = Result<T, GraphError>;

/// A graph over a dense vertex index domain
///
/// The graph is borrowed immutably for a whole algorithm run.
pub trait Graph {
    /// Number of vertices
    fn num_vertices(&self) -> usize;

    /// Iterate over all vertex indices in order
    fn vertices(&self) -> std::ops::Range<VertexIndex> {
        0..self.num_vertices()
    }
}

/// An undirected graph
///
/// Adjacency must be symmetric: if `u` is adjacent to `v`, then `v` is
/// adjacent to `u`.
pub trait UndirectedGraph: Graph {
    /// Lazy neighbor sequence of a vertex
    type Adjacent<'a>: Iterator<Item = VertexIndex>
    where
        Self: 'a;

    /// Neighbors of `v`; calling again restarts the sequence
    fn adjacent_vertices(&self, v: VertexIndex) -> Self::Adjacent<'_>;
}

/// A directed graph
pub trait DirectedGraph: Graph {
    /// Arc handle
    type Arc;

    /// Lazy outgoing arc sequence of a vertex
    type OutArcs<'a>: Iterator<Item = Self::Arc>
    where
        Self: 'a;

    /// Outgoing arcs of `v`
    fn out_arcs(&self, v: VertexIndex) -> Self::OutArcs<'_>;

    /// Head vertex of an arc
    fn target(&self, arc: &Self::Arc) -> VertexIndex;
}

impl Graph for [Vec<VertexIndex>] {
    fn num_vertices(&self) -> usize {
        self.len()
    }
}

impl UndirectedGraph for [Vec<VertexIndex>] {
    type Adjacent<'a>
        = std::iter::Copied<std::slice::Iter<'a, VertexIndex>>
    where
        Self: 'a;

    fn adjacent_vertices(&self, v: VertexIndex) -> Self::Adjacent<'_> {
        self[v].iter().copied()
    }
}

impl DirectedGraph for [Vec<VertexIndex>] {
    type Arc = VertexIndex;
    type OutArcs<'a>
        = std::iter::Copied<std::slice::Iter<'a, VertexIndex>>
    where
        Self: 'a;

    fn out_arcs(&self, v: VertexIndex) -> Self::OutArcs<'_> {
        self[v].iter().copied()
    }

    fn target(&self, arc: &VertexIndex) -> VertexIndex {
        *arc
    }
}

impl Graph for Vec<Vec<VertexIndex>> {
    fn num_vertices(&self) -> usize {
        self.len()
    }
}

impl UndirectedGraph for Vec<Vec<VertexIndex>> {
    type Adjacent<'a>
        = std::iter::Copied<std::slice::Iter<'a, VertexIndex>>
    where
        Self: 'a;

    fn adjacent_vertices(&self, v: VertexIndex) -> Self::Adjacent<'_> {
        self.as_slice().adjacent_vertices(v)
    }
}

impl DirectedGraph for Vec<Vec<VertexIndex>> {
    type Arc = VertexIndex;
    type OutArcs<'a>
        = std::iter::Copied<std::slice::Iter<'a, VertexIndex>>
    where
        Self: 'a;

    fn out_arcs(&self, v: VertexIndex) -> Self::OutArcs<'_> {
        self.as_slice().out_arcs(v)
    }

    fn target(&self, arc: &VertexIndex) -> VertexIndex {
        *arc
    }
}

/// An arc of an [`AdjacencyGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Arc {
    /// Tail vertex
    pub source: VertexIndex,
    /// Head vertex
    pub target: VertexIndex,
}

/// Arc-list graph with per-vertex outgoing arc ids
///
/// Serves both as a directed graph (arcs as added) and as an undirected
/// graph when built exclusively through [`AdjacencyGraph::add_edge`],
/// which inserts both directions.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    arcs: Vec<Arc>,
    out: Vec<Vec<ArcId>>,
}

impl AdjacencyGraph {
    /// Create a graph with `n` isolated vertices
    pub fn new(n: usize) -> Self {
        Self {
            arcs: Vec::new(),
            out: vec![Vec::new(); n],
        }
    }

    /// Build an undirected graph from an edge list
    pub fn from_edges(
        n: usize,
        edges: impl IntoIterator<Item = (VertexIndex, VertexIndex)>,
    ) -> GraphResult<Self> {
        let mut graph = Self::new(n);
        for (a, b) in edges {
            graph.add_edge(a, b)?;
        }
        Ok(graph)
    }

    /// Build a directed graph from an arc list
    pub fn from_arcs(
        n: usize,
        arcs: impl IntoIterator<Item = (VertexIndex, VertexIndex)>,
    ) -> GraphResult<Self> {
        let mut graph = Self::new(n);
        for (from, to) in arcs {
            graph.add_arc(from, to)?;
        }
        Ok(graph)
    }

    /// Add an isolated vertex and return its index
    pub fn add_vertex(&mut self) -> VertexIndex {
        self.out.push(Vec::new());
        self.out.len() - 1
    }

    /// Add a directed arc
    pub fn add_arc(&mut self, from: VertexIndex, to: VertexIndex) -> GraphResult<ArcId> {
        self.check_vertex(from)?;
        self.check_vertex(to)?;

        let id = self.arcs.len();
        self.arcs.push(Arc {
            source: from,
            target: to,
        });
        self.out[from].push(id);
        Ok(id)
    }

    /// Add an undirected edge as two opposite arcs
    pub fn add_edge(&mut self, a: VertexIndex, b: VertexIndex) -> GraphResult<()> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }

        self.add_arc(a, b)?;
        self.add_arc(b, a)?;
        Ok(())
    }

    /// Number of arcs (twice the edge count for undirected use)
    pub fn num_arcs(&self) -> usize {
        self.arcs.len()
    }

    /// Get an arc by id
    pub fn arc(&self, id: ArcId) -> Option<&Arc> {
        self.arcs.get(id)
    }

    /// All arcs in insertion order
    pub fn arcs(&self) -> &[Arc] {
        &self.arcs
    }

    fn check_vertex(&self, vertex: VertexIndex) -> GraphResult<()> {
        if vertex < self.out.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex,
                len: self.out.len(),
            })
        }
    }
}

impl Graph for AdjacencyGraph {
    fn num_vertices(&self) -> usize {
        self.out.len()
    }
}

/// Neighbor iterator of an [`AdjacencyGraph`]
pub struct Neighbors<'a> {
    arcs: &'a [Arc],
    ids: std::slice::Iter<'a, ArcId>,
}

impl Iterator for Neighbors<'_> {
    type Item = VertexIndex;

    fn next(&mut self) -> Option<VertexIndex> {
        self.ids.next().map(|&id| self.arcs[id].target)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl UndirectedGraph for AdjacencyGraph {
    type Adjacent<'a>
        = Neighbors<'a>
    where
        Self: 'a;

    fn adjacent_vertices(&self, v: VertexIndex) -> Neighbors<'_> {
        Neighbors {
            arcs: &self.arcs,
            ids: self.out[v].iter(),
        }
    }
}

impl DirectedGraph for AdjacencyGraph {
    type Arc = ArcId;
    type OutArcs<'a>
        = std::iter::Copied<std::slice::Iter<'a, ArcId>>
    where
        Self: 'a;

    fn out_arcs(&self, v: VertexIndex) -> Self::OutArcs<'_> {
        self.out[v].iter().copied()
    }

    fn target(&self, arc: &ArcId) -> VertexIndex {
        self.arcs[*arc].target
    }
}
