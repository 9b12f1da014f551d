mod constants;
pub mod cost_configuration;
pub mod error;
pub mod graph;
pub mod graph_link;
mod link_attributes;
pub mod network;
pub mod routing;
pub mod skims;
mod stopwatch;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_graph_utils;

pub use cost_configuration::CostConfiguration;
pub use error::{ConfigurationError, GraphLoadError, PathError, SkimError, StorageError};
pub use graph::{Graph, GraphId};
pub use network::{LinkDirection, LinkRecord, NetworkSource, NodeRecord, RoadDirection, RoadRecord};
pub use routing::{
    path_result::PathResult, search_stats::SearchStats, shortest_path_engine::ShortestPathEngine,
};
pub use skims::{
    skim_matrix::{SkimEntry, SkimMatrix},
    skim_runner::SkimRunner,
};
pub use types::{Cost, LinkId, NodeId, RoadId};
