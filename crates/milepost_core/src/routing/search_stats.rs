use std::time::Duration;

/// Counters collected while running one search.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    pub settled_nodes: usize,
    pub relaxed_links: usize,
    /// The search stopped at its destination instead of exhausting the graph.
    pub early_termination: bool,
    pub duration: Duration,
}
