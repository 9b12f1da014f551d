use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{self, AtomicBool};
use std::time::Instant;

use tracing::debug;

use crate::{
    constants::CANCELLATION_CHECK_INTERVAL,
    cost_configuration::CostConfiguration,
    error::PathError,
    types::{Cost, NodeId},
};

use super::{path_result::PathResult, search_stats::SearchStats};

#[derive(Copy, Clone, Debug)]
struct HeapItem {
    cost: Cost,
    sequence: u64,
    node: usize,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &HeapItem) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &HeapItem) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flip both keys to make this a min-heap, earliest push first on ties
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Label-setting (Dijkstra) search over a configured graph.
///
/// The engine only keeps its frontier between runs; the search tree lives in
/// the caller's [`PathResult`]. One engine serves any number of sequential
/// queries, concurrent queries each need their own engine and result.
pub struct ShortestPathEngine {
    heap: BinaryHeap<HeapItem>,
    sequence: u64,
    cancellation: Option<Arc<AtomicBool>>,
}

impl Default for ShortestPathEngine {
    fn default() -> Self {
        ShortestPathEngine::new()
    }
}

impl ShortestPathEngine {
    pub fn new() -> Self {
        ShortestPathEngine::with_capacity(1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        ShortestPathEngine {
            heap: BinaryHeap::with_capacity(capacity),
            sequence: 0,
            cancellation: None,
        }
    }

    /// Makes runs fail with [`PathError::Cancelled`] once `flag` is set.
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(atomic::Ordering::Relaxed))
    }

    #[inline(always)]
    fn push(&mut self, node: usize, cost: Cost) {
        self.heap.push(HeapItem {
            cost,
            sequence: self.sequence,
            node,
        });
        self.sequence += 1;
    }

    /// Computes least-cost paths from `origin`.
    ///
    /// With a destination the search stops once it is settled and its path is
    /// traced into `result`. Without one every reachable node is settled and
    /// paths are traced on demand with [`PathResult::update_trace`]. An
    /// unreachable destination leaves an empty path, it is not an error.
    ///
    /// Link costs must be non-negative.
    pub fn run(
        &mut self,
        config: &CostConfiguration,
        origin: NodeId,
        destination: Option<NodeId>,
        result: &mut PathResult,
    ) -> Result<SearchStats, PathError> {
        let start_time = Instant::now();
        result.check_compatible(config)?;

        let graph = config.graph();
        let origin_index = graph
            .node_index(origin)
            .ok_or(PathError::InvalidNode(origin))?;
        let destination_index = destination
            .map(|node| graph.node_index(node).ok_or(PathError::InvalidNode(node)))
            .transpose()?;

        result.reset();
        result.begin_search(config, origin_index);

        self.heap.clear();
        self.sequence = 0;
        self.push(origin_index, 0.0);

        let block_centroids = config.blocks_centroid_flows();
        let mut stats = SearchStats::default();

        while let Some(HeapItem { node, cost, .. }) = self.heap.pop() {
            // Node is already settled, skip
            if result.is_settled(node) {
                continue;
            }

            // Stale entry, a cheaper label was pushed later
            if cost > result.node_cost(node) {
                continue;
            }

            result.settle(node);
            stats.settled_nodes += 1;

            if Some(node) == destination_index {
                stats.early_termination = true;
                break;
            }

            if stats.settled_nodes % CANCELLATION_CHECK_INTERVAL == 0 && self.is_cancelled() {
                result.reset();
                return Err(PathError::Cancelled);
            }

            if block_centroids && node != origin_index && graph.is_centroid(node) {
                continue;
            }

            for link in graph.out_links(node) {
                let adj_node = graph.link(link).end_node();

                if result.is_settled(adj_node) {
                    continue;
                }

                stats.relaxed_links += 1;

                let next_cost = cost + config.link_cost(link);
                if next_cost < result.node_cost(adj_node) {
                    result.label(adj_node, next_cost, link);
                    self.push(adj_node, next_cost);
                }
            }
        }

        result.finish_search(!stats.early_termination);

        if let Some(destination_index) = destination_index {
            result.trace(config, destination_index);
        }

        stats.duration = start_time.elapsed();
        debug!(
            origin,
            ?destination,
            settled = stats.settled_nodes,
            relaxed = stats.relaxed_links,
            early_termination = stats.early_termination,
            duration = ?stats.duration,
            "Shortest path search finished"
        );

        Ok(stats)
    }
}
