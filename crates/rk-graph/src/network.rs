//! Kernel Networks
//!
//! Uuid-keyed graphs built by the modeling kernel: feature dependency
//! networks (directed, decomposed into strong components) and constraint
//! coupling networks (undirected, decomposed into blocks).

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

use crate::biconnected::{BlockDecomposition, BlockVisitor, Edge, biconnected_components};
use crate::config::DecompositionConfig;
use crate::graph::{AdjacencyGraph, GraphError, VertexIndex};
use crate::scc::{ComponentPartition, strong_components_with};

/// Network-related errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    #[error("Node already exists: {0}")]
    DuplicateNode(Uuid),

    #[error("Dependency cycle through {} nodes", .0.len())]
    Cycle(Vec<Uuid>),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Result type for network operations
pub type NetworkResult<T> = Result<T, NetworkError>;

/// Dense index for Uuid-keyed nodes
#[derive(Debug, Clone, Default)]
struct NodeTable {
    ids: Vec<Uuid>,
    index: HashMap<Uuid, VertexIndex>,
}

impl NodeTable {
    fn insert(&mut self, id: Uuid) -> NetworkResult<VertexIndex> {
        if self.index.contains_key(&id) {
            return Err(NetworkError::DuplicateNode(id));
        }
        let v = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, v);
        Ok(v)
    }

    fn get(&self, id: Uuid) -> NetworkResult<VertexIndex> {
        self.index
            .get(&id)
            .copied()
            .ok_or(NetworkError::NodeNotFound(id))
    }

    fn ids_of(&self, vertices: &[VertexIndex]) -> Vec<Uuid> {
        vertices.iter().map(|&v| self.ids[v]).collect()
    }
}

/// Directed dependency network between kernel objects
///
/// An arc `dependent -> dependency` means `dependent` must be rebuilt after
/// `dependency`.
#[derive(Debug, Clone, Default)]
pub struct DependencyNetwork {
    nodes: NodeTable,
    graph: AdjacencyGraph,
    config: DecompositionConfig,
}

impl DependencyNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the analyzer configuration
    pub fn with_config(mut self, config: DecompositionConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.ids.len()
    }

    /// Check if the network has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.ids.is_empty()
    }

    /// Check if a node exists
    pub fn contains(&self, id: Uuid) -> bool {
        self.nodes.index.contains_key(&id)
    }

    /// Add a node
    pub fn add_node(&mut self, id: Uuid) -> NetworkResult<VertexIndex> {
        let v = self.nodes.insert(id)?;
        let added = self.graph.add_vertex();
        debug_assert_eq!(v, added);
        Ok(v)
    }

    /// Record that `dependent` depends on `dependency`
    pub fn add_dependency(&mut self, dependent: Uuid, dependency: Uuid) -> NetworkResult<()> {
        let from = self.nodes.get(dependent)?;
        let to = self.nodes.get(dependency)?;
        if from == to {
            return Err(NetworkError::Cycle(vec![dependent]));
        }
        self.graph.add_arc(from, to)?;
        Ok(())
    }

    /// Strongly connected groups, dependencies before their dependents
    pub fn strong_groups(&self) -> Vec<Vec<Uuid>> {
        let mut partition = ComponentPartition::new();
        strong_components_with(&self.graph, &mut partition, &self.config);
        partition
            .components
            .iter()
            .map(|c| self.nodes.ids_of(c))
            .collect()
    }

    /// Groups of mutually dependent nodes
    pub fn cycles(&self) -> Vec<Vec<Uuid>> {
        self.strong_groups()
            .into_iter()
            .filter(|group| group.len() > 1)
            .collect()
    }

    /// Fail with the first dependency cycle, if any
    pub fn check_acyclic(&self) -> NetworkResult<()> {
        self.acyclic_groups().map(|_| ())
    }

    /// Rebuild order: every node after all of its dependencies
    pub fn topological_order(&self) -> NetworkResult<Vec<Uuid>> {
        Ok(self.acyclic_groups()?.into_iter().flatten().collect())
    }

    /// Strong groups, all singletons, or the first cycle
    fn acyclic_groups(&self) -> NetworkResult<Vec<Vec<Uuid>>> {
        let mut groups = self.strong_groups();
        match groups.iter().position(|g| g.len() > 1) {
            Some(i) => {
                let cycle = groups.swap_remove(i);
                tracing::warn!("Dependency cycle through {} nodes", cycle.len());
                Err(NetworkError::Cycle(cycle))
            }
            None => Ok(groups),
        }
    }
}

/// Undirected coupling network between constrained entities
///
/// Blocks of the network are the pieces a constraint solver can process
/// independently once their shared cut entities are known.
#[derive(Debug, Clone, Default)]
pub struct ConstraintNetwork {
    nodes: NodeTable,
    graph: AdjacencyGraph,
    /// Coupled pairs, smaller index first; one edge per pair
    coupled: HashSet<(VertexIndex, VertexIndex)>,
    pinned: Vec<bool>,
}

impl ConstraintNetwork {
    /// Create an empty network
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.nodes.ids.len()
    }

    /// Check if the network has no entities
    pub fn is_empty(&self) -> bool {
        self.nodes.ids.is_empty()
    }

    /// Add an entity
    pub fn add_entity(&mut self, id: Uuid) -> NetworkResult<VertexIndex> {
        let v = self.nodes.insert(id)?;
        let added = self.graph.add_vertex();
        debug_assert_eq!(v, added);
        self.pinned.push(false);
        Ok(v)
    }

    /// Couple two entities through a constraint
    ///
    /// A constraint on a single entity couples nothing and is accepted as is.
    /// Further constraints between an already coupled pair add no edge.
    pub fn add_constraint(&mut self, a: Uuid, b: Uuid) -> NetworkResult<()> {
        let va = self.nodes.get(a)?;
        let vb = self.nodes.get(b)?;
        if va == vb || !self.coupled.insert((va.min(vb), va.max(vb))) {
            return Ok(());
        }
        self.graph.add_edge(va, vb)?;
        Ok(())
    }

    /// Keep `id` from splitting blocks, even when it is a cut entity
    pub fn pin(&mut self, id: Uuid) -> NetworkResult<()> {
        let v = self.nodes.get(id)?;
        self.pinned[v] = true;
        Ok(())
    }

    /// Blocks as lists of coupled entity pairs
    pub fn blocks(&self) -> Vec<Vec<(Uuid, Uuid)>> {
        let decomposition = self.decompose();
        decomposition
            .blocks
            .iter()
            .map(|block| {
                block
                    .iter()
                    .map(|&(a, b)| (self.nodes.ids[a], self.nodes.ids[b]))
                    .collect()
            })
            .collect()
    }

    /// Entities whose removal disconnects the network
    pub fn cut_entities(&self) -> Vec<Uuid> {
        self.nodes.ids_of(&self.decompose().cut_nodes)
    }

    fn decompose(&self) -> BlockDecomposition {
        let mut visitor = PinnedBlocks {
            pinned: &self.pinned,
            result: BlockDecomposition::new(),
        };
        biconnected_components(&self.graph, &mut visitor);
        visitor.result
    }
}

struct PinnedBlocks<'a> {
    pinned: &'a [bool],
    result: BlockDecomposition,
}

impl BlockVisitor for PinnedBlocks<'_> {
    fn cut_node(&mut self, v: VertexIndex) {
        self.result.cut_node(v);
    }

    fn block_founded(&mut self, edges: &[Edge]) {
        self.result.block_founded(edges);
    }

    fn is_filtered_cut(&mut self, v: VertexIndex) -> bool {
        self.pinned[v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SccStrategy;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_topological_order() {
        // sketch <- extrude <- fillet, sketch <- revolve
        let [sketch, extrude, fillet, revolve] = ids(4).try_into().unwrap();
        let mut network = DependencyNetwork::new();
        for id in [fillet, revolve, extrude, sketch] {
            network.add_node(id).unwrap();
        }
        network.add_dependency(extrude, sketch).unwrap();
        network.add_dependency(fillet, extrude).unwrap();
        network.add_dependency(revolve, sketch).unwrap();

        let order = network.topological_order().unwrap();
        let pos = |id| order.iter().position(|&x| x == id).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos(sketch) < pos(extrude));
        assert!(pos(extrude) < pos(fillet));
        assert!(pos(sketch) < pos(revolve));
        assert!(network.check_acyclic().is_ok());
    }

    #[test]
    fn test_cycle_detection() {
        let [a, b, c, d] = ids(4).try_into().unwrap();
        let mut network = DependencyNetwork::new()
            .with_config(DecompositionConfig::new().with_strategy(SccStrategy::Iterative));
        for id in [a, b, c, d] {
            network.add_node(id).unwrap();
        }
        network.add_dependency(a, b).unwrap();
        network.add_dependency(b, c).unwrap();
        network.add_dependency(c, a).unwrap();
        network.add_dependency(d, a).unwrap();

        let cycles = network.cycles();
        assert_eq!(cycles.len(), 1);
        let mut cycle = cycles[0].clone();
        cycle.sort();
        let mut expected = vec![a, b, c];
        expected.sort();
        assert_eq!(cycle, expected);

        assert!(matches!(network.check_acyclic(), Err(NetworkError::Cycle(nodes)) if nodes.len() == 3));
        assert!(network.topological_order().is_err());
    }

    #[test]
    fn test_invalid_dependencies() {
        let [a, b] = ids(2).try_into().unwrap();
        let mut network = DependencyNetwork::new();
        network.add_node(a).unwrap();

        assert_eq!(network.add_node(a), Err(NetworkError::DuplicateNode(a)));
        assert_eq!(
            network.add_dependency(a, b),
            Err(NetworkError::NodeNotFound(b))
        );
        assert_eq!(
            network.add_dependency(a, a),
            Err(NetworkError::Cycle(vec![a]))
        );
        assert!(network.contains(a));
        assert_eq!(network.len(), 1);
    }

    #[test]
    fn test_constraint_blocks() {
        // Two constraint loops sharing entity `hub`, plus a dangling pair
        let [p0, p1, hub, p3, p4, p5] = ids(6).try_into().unwrap();
        let mut network = ConstraintNetwork::new();
        for id in [p0, p1, hub, p3, p4, p5] {
            network.add_entity(id).unwrap();
        }
        for (a, b) in [(p0, p1), (p1, hub), (hub, p0), (hub, p3), (p3, p4), (p4, hub), (p4, p5)] {
            network.add_constraint(a, b).unwrap();
        }
        // Unary constraints couple nothing
        network.add_constraint(p5, p5).unwrap();

        let mut sizes: Vec<_> = network.blocks().iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![1, 3, 3]);

        let mut cuts = network.cut_entities();
        cuts.sort();
        let mut expected = vec![hub, p4];
        expected.sort();
        assert_eq!(cuts, expected);
    }

    #[test]
    fn test_pinned_entity_keeps_blocks_together() {
        let [a, b, c] = ids(3).try_into().unwrap();
        let mut network = ConstraintNetwork::new();
        for id in [a, b, c] {
            network.add_entity(id).unwrap();
        }
        network.add_constraint(a, b).unwrap();
        network.add_constraint(b, c).unwrap();

        assert_eq!(network.blocks().len(), 2);

        network.pin(b).unwrap();
        let blocks = network.blocks();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].len(), 2);
        assert_eq!(network.cut_entities(), vec![b]);

        assert_eq!(
            network.pin(Uuid::nil()),
            Err(NetworkError::NodeNotFound(Uuid::nil()))
        );
    }

    #[test]
    fn test_repeated_constraint_keeps_every_coupling() {
        // coincident + tangent between a and b, then b - c
        let [a, b, c] = ids(3).try_into().unwrap();
        let mut network = ConstraintNetwork::new();
        for id in [a, b, c] {
            network.add_entity(id).unwrap();
        }
        network.add_constraint(a, b).unwrap();
        network.add_constraint(b, a).unwrap();
        network.add_constraint(a, b).unwrap();
        network.add_constraint(b, c).unwrap();

        let blocks = network.blocks();
        assert_eq!(blocks.len(), 2);
        let mut pairs: Vec<_> = blocks
            .iter()
            .flatten()
            .map(|&(x, y)| if x < y { (x, y) } else { (y, x) })
            .collect();
        pairs.sort();
        let mut expected: Vec<_> = [(a, b), (b, c)]
            .into_iter()
            .map(|(x, y)| if x < y { (x, y) } else { (y, x) })
            .collect();
        expected.sort();
        assert_eq!(pairs, expected, "Every coupled pair lands in exactly one block");
        assert_eq!(network.cut_entities(), vec![b]);
    }

    #[test]
    fn test_topological_order_reports_cycle() {
        let [a, b, c] = ids(3).try_into().unwrap();
        let mut network = DependencyNetwork::new();
        for id in [a, b, c] {
            network.add_node(id).unwrap();
        }
        network.add_dependency(c, a).unwrap();
        network.add_dependency(a, b).unwrap();
        network.add_dependency(b, a).unwrap();

        let Err(NetworkError::Cycle(mut cycle)) = network.topological_order() else {
            panic!("Expected a dependency cycle");
        };
        cycle.sort();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(cycle, expected);
        assert_eq!(
            network.check_acyclic(),
            Err(NetworkError::Cycle(network.cycles()[0].clone()))
        );
    }
}
