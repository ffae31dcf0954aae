//! Decomposition configuration
//!
//! Selects how the strong-components analyzer walks the graph.

/// Vertex count up to which [`SccStrategy::Auto`] recurses on the call stack
pub const DEFAULT_RECURSION_LIMIT: usize = 4096;

/// Traversal variant of the strong-components analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SccStrategy {
    /// Call-stack recursion (depth grows with the longest path)
    Recursive,
    /// Explicit heap-allocated frame stack
    Iterative,
    /// Recursive for small graphs, iterative otherwise
    #[default]
    Auto,
}

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionConfig {
    /// Traversal variant
    pub strategy: SccStrategy,
    /// Largest vertex count handled recursively under `Auto`
    pub recursion_limit: usize,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            strategy: SccStrategy::Auto,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl DecompositionConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the traversal variant
    pub fn with_strategy(mut self, strategy: SccStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the recursion limit used by `Auto`
    pub fn with_recursion_limit(mut self, recursion_limit: usize) -> Self {
        self.recursion_limit = recursion_limit;
        self
    }

    /// Concrete variant for a graph with `num_vertices` vertices
    ///
    /// Never returns `Auto`.
    pub fn resolve(&self, num_vertices: usize) -> SccStrategy {
        match self.strategy {
            SccStrategy::Auto if num_vertices <= self.recursion_limit => SccStrategy::Recursive,
            SccStrategy::Auto => SccStrategy::Iterative,
            strategy => strategy,
        }
    }
}
