use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{
    error::GraphLoadError,
    types::{LinkId, NodeId},
};

use super::{
    link_record::{LinkRecord, NodeRecord},
    road_record::RoadRecord,
};

/// An already parsed network: explicit nodes, directed links and undirected roads.
///
/// When `nodes` is empty the node set is whatever the links reference.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSource {
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub links: Vec<LinkRecord>,
    #[serde(default)]
    pub roads: Vec<RoadRecord>,
}

impl NetworkSource {
    pub fn new() -> Self {
        NetworkSource::default()
    }

    pub fn add_node(&mut self, id: NodeId) -> &mut Self {
        self.nodes.push(NodeRecord {
            id,
            centroid: false,
        });
        self
    }

    pub fn add_centroid(&mut self, id: NodeId) -> &mut Self {
        self.nodes.push(NodeRecord { id, centroid: true });
        self
    }

    pub fn add_link(&mut self, link: LinkRecord) -> &mut Self {
        self.links.push(link);
        self
    }

    pub fn add_road(&mut self, road: RoadRecord) -> &mut Self {
        self.roads.push(road);
        self
    }

    /// Explicit links followed by the links split from roads.
    ///
    /// Road links are numbered after the largest explicit link id, in road order.
    /// Fails when that numbering would go past `LinkId::MAX`.
    pub fn directed_links(&self) -> Result<Cow<'_, [LinkRecord]>, GraphLoadError> {
        if self.roads.is_empty() {
            return Ok(Cow::Borrowed(&self.links));
        }

        let mut next_link_id: Option<LinkId> =
            match self.links.iter().map(|link| link.link_id).max() {
                Some(max_link_id) => max_link_id.checked_add(1),
                None => Some(1),
            };

        let mut links = Vec::with_capacity(self.links.len() + self.roads.len() * 2);
        links.extend_from_slice(&self.links);
        for road in &self.roads {
            road.split_into(&mut next_link_id, &mut links)?;
        }

        Ok(Cow::Owned(links))
    }
}
