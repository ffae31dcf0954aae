//! Explicit frame-stack traversal
//!
//! Mirrors the recursive variant: a frame is `(vertex, remaining out-arcs)`,
//! and returning from a call pops the frame and propagates the child's
//! low-link into the new top.

use super::{ComponentVisitor, Step, StrongComponents};
use crate::graph::{DirectedGraph, VertexIndex};

impl StrongComponents {
    /// Compute strong components without recursion
    pub fn run_iterative<G, V>(&mut self, graph: &G, visitor: &mut V)
    where
        G: DirectedGraph + ?Sized,
        V: ComponentVisitor + ?Sized,
    {
        let n = graph.num_vertices();
        self.init(n);

        let mut frames: Vec<(VertexIndex, G::OutArcs<'_>)> = Vec::new();

        for root in graph.vertices() {
            if self.num[root] != 0 || visitor.is_filtered(root) {
                continue;
            }

            visitor.start(root);
            self.discover(root);
            frames.push((root, graph.out_arcs(root)));

            while let Some((v, arcs)) = frames.last_mut() {
                let v = *v;
                match arcs.next() {
                    Some(arc) => {
                        let w = graph.target(&arc);
                        if self.examine(v, w, visitor) == Step::Descend {
                            self.discover(w);
                            frames.push((w, graph.out_arcs(w)));
                        }
                    }
                    None => {
                        frames.pop();
                        self.finish(v, visitor);
                        if let Some(&(parent, _)) = frames.last() {
                            self.returned(parent, v);
                        }
                    }
                }
            }
        }

        self.log_summary("iterative", n);
    }
}
