//! Strongly Connected Components
//!
//! Tarjan-style low-link search over a directed graph. Two traversals share
//! the same low-link core: a call-stack recursive one and an iterative one
//! with an explicit frame stack. Both report identical partitions.
//!
//! Components are reported as soon as their root finishes, so every
//! component is reported after all components reachable from it.

mod iterative;
mod recursive;

use crate::config::{DecompositionConfig, SccStrategy};
use crate::graph::{DirectedGraph, VertexIndex};

/// Callbacks of the strong-components analyzer
pub trait ComponentVisitor {
    /// A new search starts at `root`
    fn start(&mut self, _root: VertexIndex) {}

    /// A complete strongly connected component
    fn component(&mut self, _vertices: &[VertexIndex]) {}

    /// Whether `v` is excluded (never started from, arcs into it skipped)
    fn is_filtered(&mut self, _v: VertexIndex) -> bool {
        false
    }
}

/// Outcome of examining one arc
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Tree arc: descend into the head
    Descend,
    /// Nothing left to do for this arc
    Skip,
}

/// Strong-components analyzer
///
/// Holds the low-link state of one run; [`StrongComponents::init`] rebuilds
/// it at the start of every run.
#[derive(Debug, Clone, Default)]
pub struct StrongComponents {
    /// Discovery order, 1-based; 0 = undiscovered
    num: Vec<usize>,
    /// Low-link value
    lval: Vec<usize>,
    /// Discovered vertices not yet assigned, increasing by `num`
    stack: Vec<VertexIndex>,
    counter: usize,
    component_count: usize,
}

impl StrongComponents {
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
        self.stack.clear();
        self.counter = 0;
        self.component_count = 0;
    }

    /// Run the variant selected by `config`
    pub fn run_with<G, V>(&mut self, graph: &G, visitor: &mut V, config: &DecompositionConfig)
    where
        G: DirectedGraph + ?Sized,
        V: ComponentVisitor + ?Sized,
    {
        match config.resolve(graph.num_vertices()) {
            SccStrategy::Recursive => self.run_recursive(graph, visitor),
            _ => self.run_iterative(graph, visitor),
        }
    }

    /// Discovery number of `v` in the last run (0 if never discovered)
    pub fn num(&self, v: VertexIndex) -> usize {
        self.num[v]
    }

    /// Low-link value of `v` in the last run
    pub fn low(&self, v: VertexIndex) -> usize {
        self.lval[v]
    }

    /// Number of components reported by the last run
    pub fn component_count(&self) -> usize {
        self.component_count
    }

    fn discover(&mut self, v: VertexIndex) {
        self.counter += 1;
        self.num[v] = self.counter;
        self.lval[v] = self.counter;
        self.stack.push(v);
    }

    fn examine<V>(&mut self, v: VertexIndex, w: VertexIndex, visitor: &mut V) -> Step
    where
        V: ComponentVisitor + ?Sized,
    {
        if w == v || visitor.is_filtered(w) {
            return Step::Skip;
        }
        if self.num[w] == 0 {
            return Step::Descend;
        }

        let num_w = self.num[w];
        if num_w < self.num[v] && num_w < self.lval[v] && self.on_stack(w) {
            self.lval[v] = num_w;
        }
        Step::Skip
    }

    /// Propagate the low-link of a finished tree child
    fn returned(&mut self, v: VertexIndex, child: VertexIndex) {
        self.lval[v] = self.lval[v].min(self.lval[child]);
    }

    fn finish<V>(&mut self, v: VertexIndex, visitor: &mut V)
    where
        V: ComponentVisitor + ?Sized,
    {
        let num_v = self.num[v];
        if self.lval[v] != num_v {
            return;
        }

        let from = self.stack.partition_point(|&x| self.num[x] < num_v);
        assert_eq!(
            self.stack.get(from),
            Some(&v),
            "component root {v} missing from the component stack"
        );

        tracing::trace!(
            "Component rooted at {} with {} vertices",
            v,
            self.stack.len() - from
        );
        self.component_count += 1;
        visitor.component(&self.stack[from..]);
        self.stack.truncate(from);
    }

    /// Membership test; the stack is sorted by `num` since only suffixes are popped
    fn on_stack(&self, w: VertexIndex) -> bool {
        self.stack
            .binary_search_by_key(&self.num[w], |&x| self.num[x])
            .is_ok()
    }

    fn log_summary(&self, variant: &str, n: usize) {
        tracing::debug!(
            "Strong components ({}) of {} vertices: {} components",
            variant,
            n,
            self.component_count
        );
    }
}

/// Run the iterative strong-components analyzer over `graph`
pub fn strong_components<G, V>(graph: &G, visitor: &mut V)
where
    G: DirectedGraph + ?Sized,
    V: ComponentVisitor + ?Sized,
{
    StrongComponents::new().run_iterative(graph, visitor);
}

/// Run the recursive strong-components analyzer over `graph`
///
/// Recursion depth equals the longest DFS path; prefer
/// [`strong_components`] for graphs of unbounded depth.
pub fn strong_components_recursive<G, V>(graph: &G, visitor: &mut V)
where
    G: DirectedGraph + ?Sized,
    V: ComponentVisitor + ?Sized,
{
    StrongComponents::new().run_recursive(graph, visitor);
}

/// Run the variant selected by `config`
pub fn strong_components_with<G, V>(graph: &G, visitor: &mut V, config: &DecompositionConfig)
where
    G: DirectedGraph + ?Sized,
    V: ComponentVisitor + ?Sized,
{
    StrongComponents::new().run_with(graph, visitor, config);
}

/// Collected strongly connected components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentPartition {
    /// Components in report order (reverse topological)
    pub components: Vec<Vec<VertexIndex>>,
    /// Component index per vertex
    component_of: Vec<Option<usize>>,
}

impl ComponentPartition {
    /// Create an empty partition
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of components
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if no component was reported
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Index of the component containing `v`
    pub fn component_of(&self, v: VertexIndex) -> Option<usize> {
        self.component_of.get(v).copied().flatten()
    }

    /// Whether `a` and `b` lie in the same component
    pub fn same_component(&self, a: VertexIndex, b: VertexIndex) -> bool {
        match (self.component_of(a), self.component_of(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Partition with each component sorted and components ordered,
    /// independent of report order
    pub fn normalized(&self) -> Vec<Vec<VertexIndex>> {
        let mut components: Vec<_> = self
            .components
            .iter()
            .map(|c| {
                let mut c = c.clone();
                c.sort_unstable();
                c
            })
            .collect();
        components.sort();
        components
    }
}

impl ComponentVisitor for ComponentPartition {
    fn component(&mut self, vertices: &[VertexIndex]) {
        let id = self.components.len();
        for &v in vertices {
            if self.component_of.len() <= v {
                self.component_of.resize(v + 1, None);
            }
            self.component_of[v] = Some(id);
        }
        self.components.push(vertices.to_vec());
    }
}

/// Compute and collect the strongly connected components of `graph`
pub fn strong_component_partition<G>(graph: &G) -> ComponentPartition
where
    G: DirectedGraph + ?Sized,
{
    let mut result = ComponentPartition::new();
    strong_components(graph, &mut result);
    result
}
