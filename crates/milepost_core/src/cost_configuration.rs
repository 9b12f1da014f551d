use tracing::warn;

use crate::{
    error::ConfigurationError,
    graph::{Graph, GraphId},
    link_attributes::AttributeColumn,
    types::Cost,
};

/// Cost and skim attributes selected for a computation session.
///
/// A configuration only borrows the graph: any number of them can be used at
/// the same time, each run owning its own engine and result.
#[derive(Debug, Clone)]
pub struct CostConfiguration<'a> {
    graph: &'a Graph,
    cost_field: String,
    costs: &'a [Cost],
    cost_column: usize,
    skim_fields: Vec<String>,
    skims: Vec<&'a [f64]>,
    skim_columns: Vec<usize>,
    block_centroid_flows: bool,
    negative_cost_links: usize,
}

/// What a search tree depends on, to check later traces against it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfigurationKey {
    graph: GraphId,
    cost_column: usize,
    skim_columns: Vec<usize>,
    block_centroid_flows: bool,
}

impl ConfigurationKey {
    /// Overwrites the key in place, reusing its allocation.
    pub fn assign(&mut self, config: &CostConfiguration) {
        self.graph = config.graph.id();
        self.cost_column = config.cost_column;
        self.skim_columns.clear();
        self.skim_columns.extend_from_slice(&config.skim_columns);
        self.block_centroid_flows = config.block_centroid_flows;
    }
}

fn resolve_column<'a>(
    graph: &'a Graph,
    field: &str,
) -> Result<(usize, &'a AttributeColumn), ConfigurationError> {
    let (index, column) = graph
        .attribute_column(field)
        .ok_or_else(|| ConfigurationError::MissingField {
            field: field.to_string(),
        })?;

    if let Some(position) = column.first_missing() {
        return Err(ConfigurationError::MissingValue {
            field: field.to_string(),
            link_id: graph.link(position).id(),
        });
    }

    Ok((index, column))
}

impl<'a> CostConfiguration<'a> {
    pub(crate) fn new<S: AsRef<str>>(
        graph: &'a Graph,
        cost_field: &str,
        skim_fields: &[S],
    ) -> Result<Self, ConfigurationError> {
        let (cost_column, costs) = resolve_column(graph, cost_field)?;
        let costs = costs.values();

        let negative_cost_links = costs.iter().filter(|&&cost| cost < 0.0).count();
        if negative_cost_links > 0 {
            warn!(
                field = cost_field,
                links = negative_cost_links,
                "Cost field has negative values, shortest paths are undefined"
            );
        }

        let mut skim_names: Vec<String> = Vec::with_capacity(skim_fields.len());
        let mut skims = Vec::with_capacity(skim_fields.len());
        let mut skim_columns = Vec::with_capacity(skim_fields.len());

        for field in skim_fields {
            let field = field.as_ref();
            if skim_names.iter().any(|name| name == field) {
                return Err(ConfigurationError::DuplicateSkim(field.to_string()));
            }

            let (column, skim) = resolve_column(graph, field)?;
            skims.push(skim.values());
            skim_columns.push(column);
            skim_names.push(field.to_string());
        }

        Ok(CostConfiguration {
            graph,
            cost_field: cost_field.to_string(),
            costs,
            cost_column,
            skim_fields: skim_names,
            skims,
            skim_columns,
            block_centroid_flows: false,
            negative_cost_links,
        })
    }

    /// Forbids paths passing through centroids other than the origin.
    pub fn block_centroid_flows(mut self, block: bool) -> Self {
        self.block_centroid_flows = block;
        self
    }

    pub fn blocks_centroid_flows(&self) -> bool {
        self.block_centroid_flows
    }

    pub fn graph(&self) -> &'a Graph {
        self.graph
    }

    pub fn cost_field(&self) -> &str {
        &self.cost_field
    }

    pub fn skim_fields(&self) -> &[String] {
        &self.skim_fields
    }

    /// Links whose cost is negative. Searches over such links are not optimal.
    pub fn negative_cost_links(&self) -> usize {
        self.negative_cost_links
    }

    pub fn skim_count(&self) -> usize {
        self.skims.len()
    }

    #[inline(always)]
    pub fn link_cost(&self, link: usize) -> Cost {
        self.costs[link]
    }

    #[inline(always)]
    pub fn skim_value(&self, skim: usize, link: usize) -> f64 {
        self.skims[skim][link]
    }

    pub(crate) fn key(&self) -> ConfigurationKey {
        ConfigurationKey {
            graph: self.graph.id(),
            cost_column: self.cost_column,
            skim_columns: self.skim_columns.clone(),
            block_centroid_flows: self.block_centroid_flows,
        }
    }

    pub(crate) fn matches(&self, key: &ConfigurationKey) -> bool {
        key.graph == self.graph.id()
            && key.cost_column == self.cost_column
            && key.skim_columns == self.skim_columns
            && key.block_centroid_flows == self.block_centroid_flows
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use crate::{
        network::{LinkRecord, NetworkSource},
        test_graph_utils::test_graph::test_network,
    };

    use super::*;

    #[test]
    fn test_configure_cost_and_skims() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph
            .configure("distance", &["free_flow_time", "toll"])
            .unwrap();

        assert_eq!(config.cost_field(), "distance");
        assert_eq!(config.skim_fields(), &["free_flow_time", "toll"]);
        assert_eq!(config.skim_count(), 2);
        assert!(!config.blocks_centroid_flows());

        let link = graph.link_position(53).unwrap();
        assert_eq!(config.link_cost(link), 341.0);
        assert_eq!(config.skim_value(0, link), 30.0);
    }

    #[test]
    fn test_missing_field() {
        let graph = Graph::load(&test_network()).unwrap();

        assert_eq!(
            graph.configure::<&str>("capacity", &[]).err(),
            Some(ConfigurationError::MissingField {
                field: "capacity".to_string()
            })
        );
        assert_eq!(
            graph.configure("distance", &["lanes"]).err(),
            Some(ConfigurationError::MissingField {
                field: "lanes".to_string()
            })
        );
    }

    #[test]
    fn test_field_missing_on_some_link() {
        let mut source = NetworkSource::new();
        source
            .add_link(LinkRecord::new(1, 1, 2).with_attribute("distance", 1.0))
            .add_link(
                LinkRecord::new(2, 2, 3)
                    .with_attribute("distance", 1.0)
                    .with_attribute("toll", 2.0),
            );
        let graph = Graph::load(&source).unwrap();

        assert_eq!(
            graph.configure("distance", &["toll"]).err(),
            Some(ConfigurationError::MissingValue {
                field: "toll".to_string(),
                link_id: 1
            })
        );
    }

    #[test]
    fn test_nan_value_is_missing() {
        let mut source = NetworkSource::new();
        source
            .add_link(LinkRecord::new(1, 1, 2).with_attribute("distance", 1.0))
            .add_link(LinkRecord::new(2, 2, 3).with_attribute("distance", f64::NAN));
        let graph = Graph::load(&source).unwrap();

        assert_eq!(
            graph.configure::<&str>("distance", &[]).err(),
            Some(ConfigurationError::MissingValue {
                field: "distance".to_string(),
                link_id: 2
            })
        );
    }

    #[test]
    fn test_duplicate_skim() {
        let graph = Graph::load(&test_network()).unwrap();

        assert_eq!(
            graph.configure("distance", &["toll", "toll"]).err(),
            Some(ConfigurationError::DuplicateSkim("toll".to_string()))
        );
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_negative_costs_are_kept_and_logged() {
        let mut source = NetworkSource::new();
        source
            .add_link(LinkRecord::new(1, 1, 2).with_attribute("grade", -3.0))
            .add_link(LinkRecord::new(2, 2, 3).with_attribute("grade", 4.0));
        let graph = Graph::load(&source).unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();

        let config = tracing::subscriber::with_default(subscriber, || {
            graph.configure::<&str>("grade", &[])
        })
        .unwrap();

        assert_eq!(config.negative_cost_links(), 1);
        assert_eq!(config.link_cost(graph.link_position(1).unwrap()), -3.0);

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("negative values"));
        assert!(output.contains("links=1"));
    }

    #[test]
    fn test_non_negative_costs_are_not_flagged() {
        let graph = Graph::load(&test_network()).unwrap();
        let config = graph.configure::<&str>("distance", &[]).unwrap();
        assert_eq!(config.negative_cost_links(), 0);
    }

    #[test]
    fn test_configurations_share_the_graph() {
        let graph = Graph::load(&test_network()).unwrap();
        let by_distance = graph.configure::<&str>("distance", &[]).unwrap();
        let by_time = graph.configure::<&str>("free_flow_time", &[]).unwrap();
        let blocked = by_distance.clone().block_centroid_flows(true);

        assert!(by_distance.matches(&by_distance.key()));
        assert!(!by_time.matches(&by_distance.key()));
        assert!(!blocked.matches(&by_distance.key()));
    }
}
