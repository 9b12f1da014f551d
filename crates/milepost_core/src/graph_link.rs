use serde::{Deserialize, Serialize};

use crate::{
    network::LinkDirection,
    types::{LinkId, RoadId},
};

/// A directed link of a loaded graph. Endpoints are dense node indices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
    id: LinkId,
    road_id: Option<RoadId>,
    direction: LinkDirection,
    start_node: usize,
    end_node: usize,
}

impl GraphLink {
    pub(crate) fn new(
        id: LinkId,
        road_id: Option<RoadId>,
        direction: LinkDirection,
        start_node: usize,
        end_node: usize,
    ) -> Self {
        GraphLink {
            id,
            road_id,
            direction,
            start_node,
            end_node,
        }
    }

    pub fn id(&self) -> LinkId {
        self.id
    }

    pub fn road_id(&self) -> Option<RoadId> {
        self.road_id
    }

    pub fn direction(&self) -> LinkDirection {
        self.direction
    }

    #[inline(always)]
    pub fn start_node(&self) -> usize {
        self.start_node
    }

    #[inline(always)]
    pub fn end_node(&self) -> usize {
        self.end_node
    }
}
