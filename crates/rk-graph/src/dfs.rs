//! Depth-First Search Engine
//!
//! Iterative depth-first traversal over an undirected graph, driven by an
//! event visitor. Recursion is emulated with an explicit frame stack so the
//! traversal depth is bounded by heap memory, not by the call stack.

use crate::graph::{UndirectedGraph, VertexIndex};

/// Traversal state of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Not yet discovered
    #[default]
    White,
    /// On the active path
    Gray,
    /// Finished
    Black,
}

/// Event callbacks of the DFS engine
///
/// Every event has a no-op default so implementers only override the ones
/// they care about.
pub trait DfsVisitor {
    /// Whether `v` must be skipped entirely (it is marked finished up front)
    fn ignored(&mut self, _v: VertexIndex) -> bool {
        false
    }

    /// `v` is the root of a new DFS tree
    fn start_node(&mut self, _v: VertexIndex) {}

    /// `v` is visited for the first time
    fn discover_node(&mut self, _v: VertexIndex) {}

    /// The edge `(v, u)` is about to be classified
    fn examine_edge(&mut self, _v: VertexIndex, _u: VertexIndex) {}

    /// `(v, u)` leads to an undiscovered vertex
    fn tree_edge(&mut self, _v: VertexIndex, _u: VertexIndex) {}

    /// `(v, u)` leads to a vertex on the active path
    fn back_edge(&mut self, _v: VertexIndex, _u: VertexIndex) {}

    /// `(v, u)` leads to a finished vertex
    fn forward_or_cross_edge(&mut self, _v: VertexIndex, _u: VertexIndex) {}

    /// All edges of `v` have been examined
    fn finish_node(&mut self, _v: VertexIndex) {}
}

/// Reusable DFS engine
///
/// Holds only the per-vertex coloring, which is rebuilt on every run.
#[derive(Debug, Clone, Default)]
pub struct DepthFirstSearch {
    colors: Vec<Color>,
}

impl DepthFirstSearch {
    /// Create an engine with no allocated state
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the coloring for a graph with `n` vertices
    pub fn init(&mut self, n: usize) {
        self.colors.clear();
        self.colors.resize(n, Color::White);
    }

    /// Color of `v` after (or during) the last run
    pub fn color(&self, v: VertexIndex) -> Color {
        self.colors[v]
    }

    /// Traverse every non-ignored vertex of `graph` in index order
    pub fn traverse<G, V>(&mut self, graph: &G, visitor: &mut V)
    where
        G: UndirectedGraph + ?Sized,
        V: DfsVisitor + ?Sized,
    {
        let n = graph.num_vertices();
        self.init(n);

        for v in graph.vertices() {
            if visitor.ignored(v) {
                self.colors[v] = Color::Black;
            }
        }

        // (vertex, remaining adjacency) pairs; top is the active vertex
        let mut stack: Vec<(VertexIndex, G::Adjacent<'_>)> = Vec::new();

        for root in graph.vertices() {
            if self.colors[root] != Color::White {
                continue;
            }

            visitor.start_node(root);
            self.colors[root] = Color::Gray;
            visitor.discover_node(root);
            stack.push((root, graph.adjacent_vertices(root)));

            while let Some((mut v, mut adjacent)) = stack.pop() {
                while let Some(u) = adjacent.next() {
                    visitor.examine_edge(v, u);
                    match self.colors[u] {
                        Color::White => {
                            visitor.tree_edge(v, u);
                            self.colors[u] = Color::Gray;
                            let rest =
                                std::mem::replace(&mut adjacent, graph.adjacent_vertices(u));
                            stack.push((v, rest));
                            v = u;
                            visitor.discover_node(u);
                        }
                        Color::Gray => visitor.back_edge(v, u),
                        Color::Black => visitor.forward_or_cross_edge(v, u),
                    }
                }

                self.colors[v] = Color::Black;
                visitor.finish_node(v);
            }
        }
    }
}

/// Run a depth-first search over the whole graph
pub fn depth_first_search<G, V>(graph: &G, visitor: &mut V)
where
    G: UndirectedGraph + ?Sized,
    V: DfsVisitor + ?Sized,
{
    DepthFirstSearch::new().traverse(graph, visitor);
}

/// A single DFS event, as recorded by [`EventLog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsEvent {
    /// [`DfsVisitor::start_node`]
    Start(VertexIndex),
    /// [`DfsVisitor::discover_node`]
    Discover(VertexIndex),
    /// [`DfsVisitor::examine_edge`]
    Examine(VertexIndex, VertexIndex),
    /// [`DfsVisitor::tree_edge`]
    Tree(VertexIndex, VertexIndex),
    /// [`DfsVisitor::back_edge`]
    Back(VertexIndex, VertexIndex),
    /// [`DfsVisitor::forward_or_cross_edge`]
    ForwardOrCross(VertexIndex, VertexIndex),
    /// [`DfsVisitor::finish_node`]
    Finish(VertexIndex),
}

/// Visitor that records the full event stream
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    /// Recorded events in emission order
    pub events: Vec<DfsEvent>,
    /// Vertices to skip
    pub skip: Vec<VertexIndex>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the given vertices during traversal
    pub fn skipping(mut self, vertices: impl IntoIterator<Item = VertexIndex>) -> Self {
        self.skip.extend(vertices);
        self
    }

    /// Discovery order of the recorded run
    pub fn discovered(&self) -> Vec<VertexIndex> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DfsEvent::Discover(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    /// Finishing order of the recorded run
    pub fn finished(&self) -> Vec<VertexIndex> {
        self.events
            .iter()
            .filter_map(|e| match e {
                DfsEvent::Finish(v) => Some(*v),
                _ => None,
            })
            .collect()
    }
}

impl DfsVisitor for EventLog {
    fn ignored(&mut self, v: VertexIndex) -> bool {
        self.skip.contains(&v)
    }

    fn start_node(&mut self, v: VertexIndex) {
        self.events.push(DfsEvent::Start(v));
    }

    fn discover_node(&mut self, v: VertexIndex) {
        self.events.push(DfsEvent::Discover(v));
    }

    fn examine_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        self.events.push(DfsEvent::Examine(v, u));
    }

    fn tree_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        self.events.push(DfsEvent::Tree(v, u));
    }

    fn back_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        self.events.push(DfsEvent::Back(v, u));
    }

    fn forward_or_cross_edge(&mut self, v: VertexIndex, u: VertexIndex) {
        self.events.push(DfsEvent::ForwardOrCross(v, u));
    }

    fn finish_node(&mut self, v: VertexIndex) {
        self.events.push(DfsEvent::Finish(v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use DfsEvent::*;

    #[test]
    fn test_path_events() {
        // 0 - 1 - 2
        let graph = AdjacencyGraph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        let mut log = EventLog::new();
        depth_first_search(&graph, &mut log);

        assert_eq!(
            log.events,
            vec![
                Start(0),
                Discover(0),
                Examine(0, 1),
                Tree(0, 1),
                Discover(1),
                Examine(1, 0),
                Back(1, 0),
                Examine(1, 2),
                Tree(1, 2),
                Discover(2),
                Examine(2, 1),
                Back(2, 1),
                Finish(2),
                Finish(1),
                Finish(0),
            ]
        );
    }

    #[test]
    fn test_triangle_classification() {
        let graph = AdjacencyGraph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
        let mut log = EventLog::new();
        depth_first_search(&graph, &mut log);

        let examined = log.events.iter().filter(|e| matches!(e, Examine(..))).count();
        let classified = log
            .events
            .iter()
            .filter(|e| matches!(e, Tree(..) | Back(..) | ForwardOrCross(..)))
            .count();
        assert_eq!(examined, 6);
        assert_eq!(classified, examined, "Every examined edge is classified once");

        // 2 -> 0 closes the cycle onto the active path
        assert!(log.events.contains(&Back(2, 0)));
        // 0 -> 2 is seen again after 2 has finished
        assert!(log.events.contains(&ForwardOrCross(0, 2)));
    }

    #[test]
    fn test_forest_and_ignored() {
        // 0 - 1   2 - 3   4
        let graph = AdjacencyGraph::from_edges(5, [(0, 1), (2, 3)]).unwrap();
        let mut log = EventLog::new().skipping([2]);
        let mut dfs = DepthFirstSearch::new();
        dfs.traverse(&graph, &mut log);

        let starts: Vec<_> = log
            .events
            .iter()
            .filter_map(|e| match e {
                Start(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(starts, vec![0, 3, 4]);
        assert_eq!(log.discovered(), vec![0, 1, 3, 4]);
        assert_eq!(log.finished(), vec![1, 0, 3, 4]);

        // Ignored vertices look finished to their neighbors
        assert!(log.events.contains(&ForwardOrCross(3, 2)));
        assert!(!log.events.contains(&Discover(2)));
        assert_eq!(dfs.color(2), Color::Black);
    }

    #[test]
    fn test_deep_path_does_not_recurse() {
        let n = 200_000;
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|v| {
                let mut adj = Vec::new();
                if v > 0 {
                    adj.push(v - 1);
                }
                if v + 1 < n {
                    adj.push(v + 1);
                }
                adj
            })
            .collect();

        let mut log = EventLog::new();
        depth_first_search(&adjacency, &mut log);

        assert_eq!(log.discovered().len(), n);
        assert_eq!(log.finished().first(), Some(&(n - 1)));
        assert_eq!(log.finished().last(), Some(&0));
    }
}
