use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{LinkId, NodeId, RoadId};

/// Direction of a link relative to the road it was digitized from.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub enum LinkDirection {
    #[default]
    #[serde(rename = "ab")]
    Forward,
    #[serde(rename = "ba")]
    Backward,
}

impl LinkDirection {
    pub fn opposite(&self) -> Self {
        match self {
            LinkDirection::Forward => LinkDirection::Backward,
            LinkDirection::Backward => LinkDirection::Forward,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    #[serde(default)]
    pub centroid: bool,
}

/// A directed link as handed over by whatever parsed the network.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub link_id: LinkId,
    pub a_node: NodeId,
    pub b_node: NodeId,
    #[serde(default)]
    pub road_id: Option<RoadId>,
    #[serde(default)]
    pub direction: LinkDirection,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
}

impl LinkRecord {
    pub fn new(link_id: LinkId, a_node: NodeId, b_node: NodeId) -> Self {
        LinkRecord {
            link_id,
            a_node,
            b_node,
            road_id: None,
            direction: LinkDirection::Forward,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: f64) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<f64> {
        self.attributes.get(name).copied()
    }
}
