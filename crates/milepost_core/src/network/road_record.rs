use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{AB_SUFFIX, BA_SUFFIX},
    error::GraphLoadError,
    types::{LinkId, NodeId, RoadId},
};

use super::link_record::{LinkDirection, LinkRecord};

#[derive(Clone, Copy, Eq, PartialEq, Debug, Default, Serialize, Deserialize)]
pub enum RoadDirection {
    #[serde(rename = "ab")]
    Forward,
    #[serde(rename = "ba")]
    Backward,
    #[default]
    #[serde(rename = "both")]
    Both,
}

impl RoadDirection {
    pub fn allows(&self, direction: LinkDirection) -> bool {
        match self {
            RoadDirection::Both => true,
            RoadDirection::Forward => direction == LinkDirection::Forward,
            RoadDirection::Backward => direction == LinkDirection::Backward,
        }
    }
}

/// An undirected road segment between `a_node` and `b_node`.
///
/// Attributes whose name ends with `_ab` or `_ba` (case-insensitive) only apply
/// to the link travelling in that direction and lose their suffix on the link.
/// Every other attribute is copied to both links.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoadRecord {
    pub road_id: RoadId,
    pub a_node: NodeId,
    pub b_node: NodeId,
    #[serde(default)]
    pub direction: RoadDirection,
    #[serde(default)]
    pub attributes: BTreeMap<String, f64>,
}

fn directional_name(name: &str) -> (&str, Option<LinkDirection>) {
    let split_at = name.len().saturating_sub(AB_SUFFIX.len());
    if !name.is_char_boundary(split_at) || split_at == 0 {
        return (name, None);
    }

    let (base, suffix) = name.split_at(split_at);
    if suffix.eq_ignore_ascii_case(AB_SUFFIX) {
        (base, Some(LinkDirection::Forward))
    } else if suffix.eq_ignore_ascii_case(BA_SUFFIX) {
        (base, Some(LinkDirection::Backward))
    } else {
        (name, None)
    }
}

impl RoadRecord {
    pub fn new(road_id: RoadId, a_node: NodeId, b_node: NodeId, direction: RoadDirection) -> Self {
        RoadRecord {
            road_id,
            a_node,
            b_node,
            direction,
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, value: f64) -> Self {
        self.attributes.insert(name.to_string(), value);
        self
    }

    /// Appends the directed links of this road, numbering them from `next_link_id`.
    ///
    /// `None` means the id space is used up.
    pub(crate) fn split_into(
        &self,
        next_link_id: &mut Option<LinkId>,
        links: &mut Vec<LinkRecord>,
    ) -> Result<(), GraphLoadError> {
        for direction in [LinkDirection::Forward, LinkDirection::Backward] {
            if !self.direction.allows(direction) {
                continue;
            }

            let (a_node, b_node) = match direction {
                LinkDirection::Forward => (self.a_node, self.b_node),
                LinkDirection::Backward => (self.b_node, self.a_node),
            };

            let attributes = self
                .attributes
                .iter()
                .filter_map(|(name, &value)| match directional_name(name) {
                    (base, Some(side)) if side == direction => Some((base.to_string(), value)),
                    (_, Some(_)) => None,
                    (base, None) => Some((base.to_string(), value)),
                })
                .collect();

            let link_id = next_link_id.ok_or(GraphLoadError::LinkIdOverflow {
                road_id: self.road_id,
            })?;

            links.push(LinkRecord {
                link_id,
                a_node,
                b_node,
                road_id: Some(self.road_id),
                direction,
                attributes,
            });
            *next_link_id = link_id.checked_add(1);
        }

        Ok(())
    }
}
