use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::info;

use crate::{
    cost_configuration::CostConfiguration,
    error::{PathError, SkimError},
    routing::{path_result::PathResult, shortest_path_engine::ShortestPathEngine},
    stopwatch::Stopwatch,
    types::NodeId,
};

use super::skim_matrix::{SkimEntry, SkimMatrix};

/// Per-thread scratch: one engine, one result and the skim totals of every node.
struct SkimWorker<'c> {
    config: &'c CostConfiguration<'c>,
    engine: ShortestPathEngine,
    result: PathResult,
    totals: Vec<f64>,
}

impl<'c> SkimWorker<'c> {
    fn new(config: &'c CostConfiguration<'c>, cancellation: Option<&Arc<AtomicBool>>) -> Self {
        let mut engine = ShortestPathEngine::new();
        if let Some(flag) = cancellation {
            engine = engine.with_cancellation(Arc::clone(flag));
        }

        SkimWorker {
            config,
            engine,
            result: PathResult::prepared(config),
            totals: vec![0.0; config.graph().node_count() * config.skim_count()],
        }
    }

    fn skim_row(
        &mut self,
        origin: NodeId,
        destinations: &[usize],
    ) -> Result<Vec<Option<SkimEntry>>, PathError> {
        let config = self.config;
        let graph = config.graph();
        let skim_count = config.skim_count();

        self.engine.run(config, origin, None, &mut self.result)?;

        // Parents settle before their children, one pass covers the whole tree
        let settle_order = self.result.settle_order();
        if let Some(&origin_index) = settle_order.first() {
            let start = origin_index * skim_count;
            self.totals[start..start + skim_count].fill(0.0);
        }
        for &node in settle_order.iter().skip(1) {
            let link = self.result.node_connector(node);
            let parent = graph.link(link).start_node();
            for skim in 0..skim_count {
                self.totals[node * skim_count + skim] =
                    self.totals[parent * skim_count + skim] + config.skim_value(skim, link);
            }
        }

        let row = destinations
            .iter()
            .map(|&destination| {
                self.result.is_settled(destination).then(|| {
                    let start = destination * skim_count;
                    SkimEntry {
                        cost: self.result.node_cost(destination),
                        skims: self.totals[start..start + skim_count].to_vec(),
                    }
                })
            })
            .collect();

        Ok(row)
    }
}

/// Computes origin-destination matrices, one all-destinations search per origin.
pub struct SkimRunner<'c> {
    config: &'c CostConfiguration<'c>,
    threads: usize,
    cancellation: Option<Arc<AtomicBool>>,
}

impl<'c> SkimRunner<'c> {
    pub fn new(config: &'c CostConfiguration<'c>) -> Self {
        SkimRunner {
            config,
            threads: 0,
            cancellation: None,
        }
    }

    /// Number of worker threads, 0 lets rayon pick one per core.
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn resolve(&self, nodes: &[NodeId]) -> Result<Vec<usize>, PathError> {
        let graph = self.config.graph();
        nodes
            .iter()
            .map(|&node| graph.node_index(node).ok_or(PathError::InvalidNode(node)))
            .collect()
    }

    pub fn run(&self, origins: &[NodeId], destinations: &[NodeId]) -> Result<SkimMatrix, SkimError> {
        let stopwatch = Stopwatch::new("skims/run");

        self.resolve(origins)?;
        let destination_indices = self.resolve(destinations)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.threads)
            .thread_name(|index| format!("milepost-skim-{index}"))
            .build()?;

        info!(
            origins = origins.len(),
            destinations = destinations.len(),
            threads = pool.current_num_threads(),
            cost = self.config.cost_field(),
            skims = ?self.config.skim_fields(),
            "Running skims"
        );

        let config = self.config;
        let cancellation = self.cancellation.as_ref();
        let entries = pool.install(|| {
            origins
                .par_iter()
                .map_init(
                    || SkimWorker::new(config, cancellation),
                    |worker, &origin| {
                        if self.is_cancelled() {
                            return Err(PathError::Cancelled);
                        }
                        worker.skim_row(origin, &destination_indices)
                    },
                )
                .collect::<Result<Vec<_>, PathError>>()
        })?;

        let matrix = SkimMatrix::new(
            config.cost_field(),
            config.skim_fields(),
            origins,
            destinations,
            entries,
        );

        info!(
            pairs = origins.len() * destinations.len(),
            reachable = matrix.reachable_pairs(),
            duration = ?stopwatch.elapsed(),
            "Finished skims"
        );
        stopwatch.report();

        Ok(matrix)
    }
}
