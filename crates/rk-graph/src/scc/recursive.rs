//! Call-stack recursive traversal

use super::{ComponentVisitor, Step, StrongComponents};
use crate::graph::{DirectedGraph, VertexIndex};

impl StrongComponents {
    /// Compute strong components recursing on the call stack
    ///
    /// Recursion depth equals the longest DFS path in `graph`.
    pub fn run_recursive<G, V>(&mut self, graph: &G, visitor: &mut V)
    where
        G: DirectedGraph + ?Sized,
        V: ComponentVisitor + ?Sized,
    {
        let n = graph.num_vertices();
        self.init(n);

        for v in graph.vertices() {
            if self.num[v] == 0 && !visitor.is_filtered(v) {
                visitor.start(v);
                self.visit(graph, v, visitor);
            }
        }

        self.log_summary("recursive", n);
    }

    fn visit<G, V>(&mut self, graph: &G, v: VertexIndex, visitor: &mut V)
    where
        G: DirectedGraph + ?Sized,
        V: ComponentVisitor + ?Sized,
    {
        self.discover(v);

        for arc in graph.out_arcs(v) {
            let w = graph.target(&arc);
            if self.examine(v, w, visitor) == Step::Descend {
                self.visit(graph, w, visitor);
                self.returned(v, w);
            }
        }

        self.finish(v, visitor);
    }
}
