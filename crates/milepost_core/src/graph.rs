use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use fixedbitset::FixedBitSet;
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    cost_configuration::CostConfiguration,
    error::{ConfigurationError, GraphLoadError},
    graph_link::GraphLink,
    link_attributes::{AttributeColumn, LinkAttributes},
    network::{LinkRecord, NetworkSource},
    stopwatch::Stopwatch,
    types::{LinkId, NodeId},
};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a loaded graph, used to detect results prepared for another graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphId(u64);

impl GraphId {
    fn next() -> Self {
        GraphId(NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Immutable network in forward-star layout.
///
/// Links are stored sorted by their start node, keeping input order among the
/// links of one node, so the outgoing links of node `n` are the contiguous
/// range `first_out[n]..first_out[n + 1]`. Nodes get dense indices in
/// ascending id order.
#[derive(Serialize, Deserialize)]
pub struct Graph {
    #[serde(skip, default = "GraphId::next")]
    id: GraphId,
    node_ids: Vec<NodeId>,
    node_index: FxHashMap<NodeId, usize>,
    centroids: FixedBitSet,
    first_out: Vec<usize>,
    links: Vec<GraphLink>,
    link_index: FxHashMap<LinkId, usize>,
    attributes: LinkAttributes,
}

fn collect_nodes(source: &NetworkSource, links: &[LinkRecord]) -> Result<Vec<NodeId>, GraphLoadError> {
    if source.nodes.is_empty() {
        let mut node_ids: Vec<NodeId> = links
            .iter()
            .flat_map(|link| [link.a_node, link.b_node])
            .collect();
        node_ids.sort_unstable();
        node_ids.dedup();
        return Ok(node_ids);
    }

    let mut seen = FxHashSet::default();
    for node in &source.nodes {
        if !seen.insert(node.id) {
            return Err(GraphLoadError::DuplicateNode(node.id));
        }
    }

    let mut node_ids: Vec<NodeId> = source.nodes.iter().map(|node| node.id).collect();
    node_ids.sort_unstable();
    Ok(node_ids)
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("nodes", &self.node_count())
            .field("links", &self.link_count())
            .field("centroids", &self.centroid_count())
            .finish()
    }
}

impl Graph {
    pub fn load(source: &NetworkSource) -> Result<Graph, GraphLoadError> {
        let stopwatch = Stopwatch::new("graph/load");
        let records = source.directed_links()?;

        let node_ids = collect_nodes(source, &records)?;
        let node_index: FxHashMap<NodeId, usize> = node_ids
            .iter()
            .enumerate()
            .map(|(index, &id)| (id, index))
            .collect();

        let mut centroids = FixedBitSet::with_capacity(node_ids.len());
        for node in source.nodes.iter().filter(|node| node.centroid) {
            centroids.insert(node_index[&node.id]);
        }

        let resolve = |link: &LinkRecord, node_id: NodeId| {
            node_index
                .get(&node_id)
                .copied()
                .ok_or(GraphLoadError::UnknownNode {
                    link_id: link.link_id,
                    node_id,
                })
        };

        let mut seen_links = FxHashSet::default();
        let mut endpoints = Vec::with_capacity(records.len());
        let mut first_out = vec![0usize; node_ids.len() + 1];

        for link in records.iter() {
            if !seen_links.insert(link.link_id) {
                return Err(GraphLoadError::DuplicateLink(link.link_id));
            }
            let start = resolve(link, link.a_node)?;
            let end = resolve(link, link.b_node)?;
            first_out[start + 1] += 1;
            endpoints.push((start, end));
        }

        for node in 0..node_ids.len() {
            first_out[node + 1] += first_out[node];
        }

        // Counting sort by start node, stable with respect to input order
        let mut next_slot = first_out[..node_ids.len()].to_vec();
        let mut order = vec![0usize; records.len()];
        for (position, &(start, _)) in endpoints.iter().enumerate() {
            order[next_slot[start]] = position;
            next_slot[start] += 1;
        }

        let links: Vec<GraphLink> = order
            .iter()
            .map(|&position| {
                let record = &records[position];
                let (start, end) = endpoints[position];
                GraphLink::new(record.link_id, record.road_id, record.direction, start, end)
            })
            .collect();

        let link_index = links
            .iter()
            .enumerate()
            .map(|(index, link)| (link.id(), index))
            .collect();

        let ordered_records: Vec<&LinkRecord> =
            order.iter().map(|&position| &records[position]).collect();
        let attributes = LinkAttributes::from_records(&ordered_records);

        let graph = Graph {
            id: GraphId::next(),
            node_ids,
            node_index,
            centroids,
            first_out,
            links,
            link_index,
            attributes,
        };

        info!(
            nodes = graph.node_count(),
            links = graph.link_count(),
            centroids = graph.centroid_count(),
            attributes = graph.attributes.len(),
            "Loaded graph"
        );
        stopwatch.report();

        Ok(graph)
    }

    /// Selects the cost and skim attributes for a computation session.
    pub fn configure<S: AsRef<str>>(
        &self,
        cost_field: &str,
        skim_fields: &[S],
    ) -> Result<CostConfiguration<'_>, ConfigurationError> {
        CostConfiguration::new(self, cost_field, skim_fields)
    }

    pub fn id(&self) -> GraphId {
        self.id
    }

    pub fn node_count(&self) -> usize {
        self.node_ids.len()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn centroid_count(&self) -> usize {
        self.centroids.count_ones(..)
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.node_index.contains_key(&node_id)
    }

    #[inline(always)]
    pub fn node_index(&self, node_id: NodeId) -> Option<usize> {
        self.node_index.get(&node_id).copied()
    }

    #[inline(always)]
    pub fn node_id(&self, node: usize) -> NodeId {
        self.node_ids[node]
    }

    #[inline(always)]
    pub fn is_centroid(&self, node: usize) -> bool {
        self.centroids.contains(node)
    }

    /// Positions of the links leaving `node`.
    #[inline(always)]
    pub fn out_links(&self, node: usize) -> Range<usize> {
        self.first_out[node]..self.first_out[node + 1]
    }

    pub fn out_degree(&self, node: usize) -> usize {
        self.first_out[node + 1] - self.first_out[node]
    }

    #[inline(always)]
    pub fn link(&self, link: usize) -> &GraphLink {
        &self.links[link]
    }

    pub fn links(&self) -> &[GraphLink] {
        &self.links
    }

    pub fn link_position(&self, link_id: LinkId) -> Option<usize> {
        self.link_index.get(&link_id).copied()
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.names()
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.column_index(name).is_some()
    }

    /// Value of `name` on the link with id `link_id`, if both exist.
    pub fn link_attribute(&self, link_id: LinkId, name: &str) -> Option<f64> {
        let column = self.attributes.column_index(name)?;
        let link = self.link_position(link_id)?;
        let value = self.attributes.column(column).values()[link];
        (!value.is_nan()).then_some(value)
    }

    pub(crate) fn attribute_column(&self, name: &str) -> Option<(usize, &AttributeColumn)> {
        self.attributes
            .column_index(name)
            .map(|index| (index, self.attributes.column(index)))
    }

    /// Checks the invariants `load` establishes, for graphs that did not come
    /// from `load` such as decoded snapshots.
    pub(crate) fn validate(&self) -> Result<(), GraphLoadError> {
        let node_count = self.node_ids.len();
        let link_count = self.links.len();

        if self.node_index.len() != node_count || self.centroids.len() != node_count {
            return Err(GraphLoadError::Corrupted("node table size"));
        }
        for (index, node_id) in self.node_ids.iter().enumerate() {
            if self.node_index.get(node_id) != Some(&index) {
                return Err(GraphLoadError::Corrupted("node index entry"));
            }
        }

        if self.first_out.len() != node_count + 1
            || self.first_out.first() != Some(&0)
            || self.first_out.last() != Some(&link_count)
            || self.first_out.windows(2).any(|range| range[0] > range[1])
        {
            return Err(GraphLoadError::Corrupted("forward star offsets"));
        }

        if self.link_index.len() != link_count {
            return Err(GraphLoadError::Corrupted("link index size"));
        }
        for node in 0..node_count {
            for position in self.out_links(node) {
                let link = &self.links[position];
                if link.start_node() != node || link.end_node() >= node_count {
                    return Err(GraphLoadError::Corrupted("link endpoints"));
                }
                if self.link_index.get(&link.id()) != Some(&position) {
                    return Err(GraphLoadError::Corrupted("link index entry"));
                }
            }
        }

        self.attributes.validate(link_count)
    }
}
