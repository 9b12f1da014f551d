use fixedbitset::FixedBitSet;

use crate::{
    constants::{INVALID_LINK, INVALID_NODE, MAX_COST},
    cost_configuration::{ConfigurationKey, CostConfiguration},
    error::PathError,
    graph::{Graph, GraphId},
    network::LinkDirection,
    types::{Cost, LinkId, NodeId},
};

/// Reusable buffer holding the search tree of one query and the traced path.
///
/// `prepare` sizes the per-node arrays once for a graph. Every run only
/// touches the nodes it labels and `reset` restores just those, so repeated
/// queries on the same graph neither allocate nor pay O(V) to clean up.
pub struct PathResult {
    graph: Option<GraphId>,
    skim_names: Vec<String>,

    cost: Vec<Cost>,
    connector: Vec<usize>,
    settled: FixedBitSet,
    touched: Vec<usize>,
    settle_order: Vec<usize>,

    origin: usize,
    search_complete: bool,
    search_exhausted: bool,
    search_key: Option<ConfigurationKey>,

    destination: Option<NodeId>,
    path: Vec<LinkId>,
    path_directions: Vec<LinkDirection>,
    path_nodes: Vec<NodeId>,
    milepost: Vec<Cost>,
    skims: Vec<f64>,
    trace_links: Vec<usize>,
}

impl PathResult {
    pub fn new() -> Self {
        PathResult {
            graph: None,
            skim_names: Vec::new(),
            cost: Vec::new(),
            connector: Vec::new(),
            settled: FixedBitSet::new(),
            touched: Vec::new(),
            settle_order: Vec::new(),
            origin: INVALID_NODE,
            search_complete: false,
            search_exhausted: false,
            search_key: None,
            destination: None,
            path: Vec::new(),
            path_directions: Vec::new(),
            path_nodes: Vec::new(),
            milepost: Vec::new(),
            skims: Vec::new(),
            trace_links: Vec::new(),
        }
    }

    /// A result already prepared for `config`.
    pub fn prepared(config: &CostConfiguration) -> Self {
        let mut result = PathResult::new();
        result.prepare(config);
        result
    }

    /// Sizes the buffers for the graph and skim fields of `config`.
    ///
    /// Preparing again for the same graph keeps the allocations.
    pub fn prepare(&mut self, config: &CostConfiguration) {
        let node_count = config.graph().node_count();

        self.graph = Some(config.graph().id());
        self.skim_names.clear();
        self.skim_names.extend_from_slice(config.skim_fields());

        self.cost.clear();
        self.cost.resize(node_count, MAX_COST);
        self.connector.clear();
        self.connector.resize(node_count, INVALID_LINK);
        if self.settled.len() == node_count {
            self.settled.clear();
        } else {
            self.settled = FixedBitSet::with_capacity(node_count);
        }
        self.touched.clear();
        self.settle_order.clear();
        self.skims.clear();
        self.skims.resize(config.skim_count(), 0.0);

        self.origin = INVALID_NODE;
        self.search_complete = false;
        self.search_exhausted = false;
        self.clear_trace();
    }

    pub fn is_prepared(&self) -> bool {
        self.graph.is_some()
    }

    /// Clears the search tree and the traced path, keeping every allocation.
    pub fn reset(&mut self) {
        for &node in &self.touched {
            self.cost[node] = MAX_COST;
            self.connector[node] = INVALID_LINK;
            self.settled.set(node, false);
        }
        self.touched.clear();
        self.settle_order.clear();

        self.origin = INVALID_NODE;
        self.search_complete = false;
        self.search_exhausted = false;
        self.clear_trace();
    }

    fn clear_trace(&mut self) {
        self.destination = None;
        self.path.clear();
        self.path_directions.clear();
        self.path_nodes.clear();
        self.milepost.clear();
        self.skims.fill(0.0);
    }

    pub(crate) fn check_compatible(&self, config: &CostConfiguration) -> Result<(), PathError> {
        match self.graph {
            None => Err(PathError::UnpreparedResult),
            Some(id) if id != config.graph().id() => Err(PathError::GraphMismatch),
            Some(_) if self.skim_names != config.skim_fields() => {
                Err(PathError::ConfigurationMismatch)
            }
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn begin_search(&mut self, config: &CostConfiguration, origin: usize) {
        match self.search_key.as_mut() {
            Some(key) => key.assign(config),
            None => self.search_key = Some(config.key()),
        }

        self.origin = origin;
        self.label(origin, 0.0, INVALID_LINK);
    }

    pub(crate) fn finish_search(&mut self, exhausted: bool) {
        self.search_complete = true;
        self.search_exhausted = exhausted;
    }

    #[inline(always)]
    pub(crate) fn label(&mut self, node: usize, cost: Cost, connector: usize) {
        if self.cost[node] == MAX_COST {
            self.touched.push(node);
        }
        self.cost[node] = cost;
        self.connector[node] = connector;
    }

    #[inline(always)]
    pub(crate) fn settle(&mut self, node: usize) {
        self.settled.insert(node);
        self.settle_order.push(node);
    }

    #[inline(always)]
    pub(crate) fn is_settled(&self, node: usize) -> bool {
        self.settled.contains(node)
    }

    #[inline(always)]
    pub(crate) fn node_cost(&self, node: usize) -> Cost {
        self.cost[node]
    }

    #[inline(always)]
    pub(crate) fn node_connector(&self, node: usize) -> usize {
        self.connector[node]
    }

    /// Nodes in the order the last search settled them, origin first.
    pub(crate) fn settle_order(&self) -> &[usize] {
        &self.settle_order
    }

    /// Rebuilds path, node sequence, mileposts and skims towards `destination`
    /// by following connectors back to the origin.
    pub(crate) fn trace(&mut self, config: &CostConfiguration, destination: usize) {
        let graph = config.graph();
        self.clear_trace();
        self.destination = Some(graph.node_id(destination));

        if self.cost[destination] == MAX_COST {
            return;
        }

        self.trace_links.clear();
        let mut node = destination;
        while node != self.origin {
            let link = self.connector[node];
            self.trace_links.push(link);
            node = graph.link(link).start_node();
        }
        self.trace_links.reverse();

        let mut milepost = 0.0;
        self.path_nodes.push(graph.node_id(self.origin));
        self.milepost.push(milepost);

        for &link_position in &self.trace_links {
            let link = graph.link(link_position);
            milepost += config.link_cost(link_position);

            self.path.push(link.id());
            self.path_directions.push(link.direction());
            self.path_nodes.push(graph.node_id(link.end_node()));
            self.milepost.push(milepost);

            for (skim, total) in self.skims.iter_mut().enumerate() {
                *total += config.skim_value(skim, link_position);
            }
        }
    }

    /// Traces the path to another destination from the tree of the last search.
    ///
    /// Any node can be traced after a search without destination. After an
    /// early-terminated search only nodes settled before it stopped can.
    pub fn update_trace(
        &mut self,
        config: &CostConfiguration,
        destination: NodeId,
    ) -> Result<(), PathError> {
        self.check_compatible(config)?;

        if !self.search_complete {
            return Err(PathError::NoSearchTree);
        }

        match &self.search_key {
            Some(key) if config.matches(key) => {}
            _ => return Err(PathError::ConfigurationMismatch),
        }

        let destination_index = config
            .graph()
            .node_index(destination)
            .ok_or(PathError::InvalidNode(destination))?;

        if !self.search_exhausted && !self.is_settled(destination_index) {
            return Err(PathError::OutsideSearchTree(destination));
        }

        self.trace(config, destination_index);
        Ok(())
    }

    /// Link ids from origin to destination. Empty when no path exists.
    pub fn path(&self) -> &[LinkId] {
        &self.path
    }

    pub fn path_directions(&self) -> &[LinkDirection] {
        &self.path_directions
    }

    /// Node ids from origin to destination, one more than the links.
    pub fn path_nodes(&self) -> &[NodeId] {
        &self.path_nodes
    }

    /// Cumulative cost at each entry of `path_nodes`, starting at zero.
    pub fn milepost(&self) -> &[Cost] {
        &self.milepost
    }

    /// Total cost of the traced path.
    pub fn path_cost(&self) -> Option<Cost> {
        self.milepost.last().copied()
    }

    pub fn has_path(&self) -> bool {
        !self.path_nodes.is_empty()
    }

    /// Skim totals along the traced path, in configuration order.
    pub fn skims(&self) -> impl Iterator<Item = (&str, f64)> {
        self.skim_names
            .iter()
            .map(String::as_str)
            .zip(self.skims.iter().copied())
    }

    pub fn skim(&self, name: &str) -> Option<f64> {
        self.skims().find(|(skim, _)| *skim == name).map(|(_, total)| total)
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.destination
    }

    pub fn origin(&self, graph: &Graph) -> Option<NodeId> {
        (self.origin != INVALID_NODE).then(|| graph.node_id(self.origin))
    }

    /// Whether the last search labelled `node` with a finite cost.
    pub fn is_reached(&self, graph: &Graph, node: NodeId) -> bool {
        self.cost_to(graph, node).is_some()
    }

    /// Best cost found to `node` by the last search.
    ///
    /// Only final for settled nodes; an early-terminated search may leave
    /// larger tentative costs on the frontier.
    pub fn cost_to(&self, graph: &Graph, node: NodeId) -> Option<Cost> {
        let index = graph.node_index(node)?;
        if self.graph != Some(graph.id()) {
            return None;
        }
        let cost = self.cost[index];
        (cost != MAX_COST).then_some(cost)
    }

    pub fn settled_count(&self) -> usize {
        self.settle_order.len()
    }
}

impl Default for PathResult {
    fn default() -> Self {
        PathResult::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        network::{LinkRecord, NetworkSource},
        routing::shortest_path_engine::ShortestPathEngine,
        test_graph_utils::test_graph::test_network,
    };

    use super::*;

    #[test]
    fn test_unprepared() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph.configure::<&str>("distance", &[]).unwrap();
        let result = PathResult::new();

        assert!(!result.is_prepared());
        assert_eq!(
            result.check_compatible(&config),
            Err(PathError::UnpreparedResult)
        );
    }

    #[test]
    fn test_prepare_sizes_buffers() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph.configure("distance", &["toll"]).unwrap();
        let mut result = PathResult::new();
        result.prepare(&config);

        assert!(result.is_prepared());
        assert_eq!(result.cost.len(), graph.node_count());
        assert_eq!(result.connector.len(), graph.node_count());
        assert_eq!(result.settled.len(), graph.node_count());
        assert_eq!(result.skims().collect::<Vec<_>>(), vec![("toll", 0.0)]);
        assert!(!result.has_path());
    }

    #[test]
    fn test_graph_mismatch() {
        let source = test_network();
        let graph = Graph::load(&source).unwrap();
        let other = Graph::load(&source).unwrap();

        let mut result = PathResult::new();
        result.prepare(&graph.configure::<&str>("distance", &[]).unwrap());

        let other_config = other.configure::<&str>("distance", &[]).unwrap();
        assert_eq!(
            result.check_compatible(&other_config),
            Err(PathError::GraphMismatch)
        );
    }

    #[test]
    fn test_skim_mismatch() {
        let graph = Graph::load(&test_network()).unwrap();

        let mut result = PathResult::new();
        result.prepare(&graph.configure("distance", &["toll"]).unwrap());

        let config = graph.configure("distance", &["free_flow_time"]).unwrap();
        assert_eq!(
            result.check_compatible(&config),
            Err(PathError::ConfigurationMismatch)
        );
    }

    #[test]
    fn test_reset_only_restores_touched_nodes() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph.configure::<&str>("distance", &[]).unwrap();
        let mut result = PathResult::new();
        result.prepare(&config);

        let mut engine = ShortestPathEngine::new();
        engine.run(&config, 5, Some(27), &mut result).unwrap();
        assert!(!result.touched.is_empty());
        assert!(result.has_path());

        result.reset();

        assert!(result.touched.is_empty());
        assert!(result.settle_order().is_empty());
        assert!(result.cost.iter().all(|&cost| cost == MAX_COST));
        assert!(result.connector.iter().all(|&link| link == INVALID_LINK));
        assert_eq!(result.settled.count_ones(..), 0);
        assert!(!result.has_path());
        assert_eq!(result.origin(&graph), None);
    }

    #[test]
    fn test_update_trace_requires_search() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph.configure::<&str>("distance", &[]).unwrap();
        let mut result = PathResult::new();
        result.prepare(&config);

        assert_eq!(
            result.update_trace(&config, 27),
            Err(PathError::NoSearchTree)
        );
    }

    #[test]
    fn test_update_trace_rejects_other_configuration() {
        let graph = Graph::load(&test_network()).unwrap();
        let by_distance = graph.configure::<&str>("distance", &[]).unwrap();
        let by_time = graph.configure::<&str>("free_flow_time", &[]).unwrap();

        let mut result = PathResult::new();
        result.prepare(&by_distance);
        ShortestPathEngine::new()
            .run(&by_distance, 5, None, &mut result)
            .unwrap();

        assert_eq!(
            result.update_trace(&by_time, 27),
            Err(PathError::ConfigurationMismatch)
        );
    }

    #[test]
    fn test_trace_to_origin() {
        let mut source = NetworkSource::new();
        source.add_link(LinkRecord::new(1, 1, 2).with_attribute("distance", 4.0));
        let graph = Graph::load(&source).unwrap();
        let config = graph.configure::<&str>("distance", &[]).unwrap();

        let mut result = PathResult::new();
        result.prepare(&config);
        ShortestPathEngine::new()
            .run(&config, 1, Some(1), &mut result)
            .unwrap();

        assert!(result.path().is_empty());
        assert_eq!(result.path_nodes(), &[1]);
        assert_eq!(result.milepost(), &[0.0]);
        assert_eq!(result.path_cost(), Some(0.0));
    }
}
