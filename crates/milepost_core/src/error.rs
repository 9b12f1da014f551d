use thiserror::Error;

use crate::types::{LinkId, NodeId, RoadId};

#[derive(Error, Debug, PartialEq)]
pub enum GraphLoadError {
    #[error("Link id {0} appears more than once")]
    DuplicateLink(LinkId),
    #[error("Node id {0} appears more than once")]
    DuplicateNode(NodeId),
    #[error("Link {link_id} references unknown node {node_id}")]
    UnknownNode { link_id: LinkId, node_id: NodeId },
    #[error("No link id left to number the links of road {road_id}")]
    LinkIdOverflow { road_id: RoadId },
    #[error("Graph data is inconsistent: {0}")]
    Corrupted(&'static str),
}

#[derive(Error, Debug, PartialEq)]
pub enum ConfigurationError {
    #[error("Field '{field}' does not exist on the graph links")]
    MissingField { field: String },
    #[error("Field '{field}' has no value on link {link_id}")]
    MissingValue { field: String, link_id: LinkId },
    #[error("Skim field '{0}' is requested more than once")]
    DuplicateSkim(String),
}

#[derive(Error, Debug, PartialEq)]
pub enum PathError {
    #[error("Node {0} does not exist in the graph")]
    InvalidNode(NodeId),
    #[error("Path result has not been prepared")]
    UnpreparedResult,
    #[error("Path result was prepared for a different graph")]
    GraphMismatch,
    #[error("Path result was prepared or searched with a different cost configuration")]
    ConfigurationMismatch,
    #[error("Path search was cancelled")]
    Cancelled,
    #[error("No completed search to trace a path from")]
    NoSearchTree,
    #[error("Node {0} was not settled by the last search")]
    OutsideSearchTree(NodeId),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to access graph file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse network source: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to encode graph file: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("Failed to decode graph file: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("Failed to load network: {0}")]
    Load(#[from] GraphLoadError),
}

#[derive(Error, Debug)]
pub enum SkimError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("Failed to build skim thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
