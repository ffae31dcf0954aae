//! Biconnected Components
//!
//! Articulation points and edge-disjoint 2-connected blocks of an
//! undirected graph, computed as a visitor riding the DFS engine.

use crate::dfs::{DepthFirstSearch, DfsVisitor};
use crate::graph::{UndirectedGraph, VertexIndex};

/// An undirected edge as traversed, `(from, to)`
pub type Edge = (VertexIndex, VertexIndex);

/// Callbacks of the biconnected-components analyzer
pub trait BlockVisitor {
    /// Whether `v` is excluded from the traversal
    fn ignored(&mut self, _v: VertexIndex) -> bool {
        false
    }

    /// `v` is an articulation point (reported once per vertex)
    fn cut_node(&mut self, _v: VertexIndex) {}

    /// A complete block, as the edges it contains
    fn block_founded(&mut self, _edges: &[Edge]) {}

    /// Whether `v` must not split blocks even when it is a cut node
    fn is_filtered_cut(&mut self, _v: VertexIndex) -> bool {
        false
    }
}

/// Biconnected-components analyzer
///
/// All state is rebuilt by [`BiconnectedComponents::init`] at the start of
/// every run; the accessors expose the last run's numbering.
#[derive(Debug, Clone, Default)]
pub struct BiconnectedComponents {
    /// Discovery order, 1-based; 0 = undiscovered
    num: Vec<usize>,
    /// Low-link value
    lval: Vec<usize>,
    /// DFS tree parent; `None` for roots
    father: Vec<Option<VertexIndex>>,
    /// Number of tree children
    children: Vec<usize>,
    /// Whether a cut node has been reported already
    is_cut: Vec<bool>,
    /// Tree and back edges not yet attributed to a block
    edge_stack: Vec<Edge>,
    counter: usize,
    block_count: usize,
    cut_count: usize,
}

impl BiconnectedComponents {
    /// Create an analyzer with no allocated state
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all state for a graph with `n` vertices
    pub fn init(&mut self, n: usize) {
        self.num.clear();
        self.num.resize(n, 0);
        self.lval.clear();
        self.lval.resize(n, 0);
        self.father.clear();
        self.father.resize(n, None);
        self.children.clear();
        self.children.resize(n, 0);
        self.is_cut.clear();
        self.is_cut.resize(n, false);
        self.edge_stack.clear();
        self.counter = 0;
        self.block_count = 0;
        self.cut_count = 0;
    }

    /// Decompose `graph`, reporting blocks and cut nodes to `visitor`
    pub fn run<G, V>(&mut self, graph: &G, visitor: &mut V)
    where
        G: UndirectedGraph + ?Sized,
        V: BlockVisitor + ?Sized,
    {
        let n = graph.num_vertices();
        self.init(n);

        let mut search = BlockSearch {
            state: &mut *self,
            visitor,
        };
        DepthFirstSearch::new().traverse(graph, &mut search);

        tracing::debug!(
            "Biconnected decomposition of {} vertices: {} blocks, {} cut nodes",
            n,
            self.block_count,
            self.cut_count
        );
    }

    /// Discovery number of `v` in the last run (0 if never discovered)
    pub fn num(&self, v: VertexIndex) -> usize {
        self.num[v]
    }

    /// Low-link value of `v` in the last run
    pub fn low(&self, v: VertexIndex) -> usize {
        self.lval[v]
    }

    /// DFS tree parent of `v` in the last run
    pub fn father(&self, v: VertexIndex) -> Option<VertexIndex> {
        self.father[v]
    }

    fn report_cut<V: BlockVisitor + ?Sized>(&mut self, v: VertexIndex, visitor: &mut V) {
        if !self.is_cut[v] {
            self.is_cut[v] = true;
            self.cut_count += 1;
            visitor.cut_node(v);
        }
    }

    fn report_block<V: BlockVisitor + ?Sized>(&mut self, from: usize, visitor: &mut V) {
        if from == self.edge_stack.len() {
            return;
        }
        tracing::trace!("Block founded with {} edges", self.edge_stack.len() - from);
        self.block_count += 1;
        visitor.block_founded(&self.edge_stack[from..]);
        self.edge_stack.truncate(from);
    }
}

/// DFS visitor adapter binding the analyzer state to a caller's visitor
struct BlockSearch<'a, V: ?Sized> {
    state: &'a mut BiconnectedComponents,
    visitor: &'a mut V,
}

impl<V: BlockVisitor + ?Sized> DfsVisitor for BlockSearch<'_, V> {
    fn ignored(&mut self, v: VertexIndex) -> bool {
        self.visitor.ignored(v)
    }

    fn discover_node(&mut self, v: VertexIndex) {
        let state = &mut *self.state;
        state.counter += 1;
        state.num[v] = state.counter;
        state.lval[v] = state.counter;
    }

    fn tree_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        let state = &mut *self.state;
        state.edge_stack.push((v, u));
        state.father[u] = Some(v);
        state.children[v] += 1;
    }

    fn back_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        let state = &mut *self.state;
        // The tree edge seen from the child side
        if state.father[v] == Some(u) {
            return;
        }
        state.edge_stack.push((v, u));
        state.lval[v] = state.lval[v].min(state.num[u]);
    }

    fn finish_node(&mut self, u: VertexIndex) {
        let state = &mut *self.state;

        let Some(v) = state.father[u] else {
            if state.children[u] > 1 {
                state.report_cut(u, self.visitor);
            }
            state.report_block(0, self.visitor);
            return;
        };

        state.lval[v] = state.lval[v].min(state.lval[u]);
        if state.lval[u] < state.num[v] {
            return;
        }

        // Roots are resolved when they finish
        if state.father[v].is_some() {
            state.report_cut(v, self.visitor);
        }
        if self.visitor.is_filtered_cut(v) {
            return;
        }

        let Some(from) = state.edge_stack.iter().rposition(|&e| e == (v, u)) else {
            panic!("tree edge ({v}, {u}) missing from the edge stack; adjacency is not symmetric");
        };
        state.report_block(from, self.visitor);
    }
}

/// Run the biconnected-components analyzer over `graph`
pub fn biconnected_components<G, V>(graph: &G, visitor: &mut V)
where
    G: UndirectedGraph + ?Sized,
    V: BlockVisitor + ?Sized,
{
    BiconnectedComponents::new().run(graph, visitor);
}

/// Collected result of a biconnected decomposition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDecomposition {
    /// Articulation points in report order
    pub cut_nodes: Vec<VertexIndex>,
    /// Blocks in report order
    pub blocks: Vec<Vec<Edge>>,
}

impl BlockDecomposition {
    /// Create an empty decomposition
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Sorted, deduplicated vertex set of a block
    pub fn block_vertices(&self, index: usize) -> Vec<VertexIndex> {
        let mut vertices: Vec<_> = self.blocks[index]
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .collect();
        vertices.sort_unstable();
        vertices.dedup();
        vertices
    }

    /// Whether `v` was reported as an articulation point
    pub fn is_cut_node(&self, v: VertexIndex) -> bool {
        self.cut_nodes.contains(&v)
    }
}

impl BlockVisitor for BlockDecomposition {
    fn cut_node(&mut self, v: VertexIndex) {
        self.cut_nodes.push(v);
    }

    fn block_founded(&mut self, edges: &[Edge]) {
        self.blocks.push(edges.to_vec());
    }
}

/// Decompose `graph` into blocks and collect the result
pub fn biconnected_decomposition<G>(graph: &G) -> BlockDecomposition
where
    G: UndirectedGraph + ?Sized,
{
    let mut result = BlockDecomposition::new();
    biconnected_components(graph, &mut result);
    result
}
