mod link_record;
mod network_source;
mod road_record;

pub use link_record::{LinkDirection, LinkRecord, NodeRecord};
pub use network_source::NetworkSource;
pub use road_record::{RoadDirection, RoadRecord};
