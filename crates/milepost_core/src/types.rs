pub type NodeId = u64;
pub type LinkId = u64;
pub type RoadId = u64;

/// Value of the cost attribute selected for a search, accumulated along paths.
pub type Cost = f64;
