use std::path::{Path, PathBuf};

use clap::Args;
use milepost_core::{CostConfiguration, Graph};
use tracing::info;

/// Graph and cost selection shared by the query commands.
#[derive(Args)]
pub struct QueryArgs {
    /// Network JSON, or a graph compiled with `compile` (.bin)
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Link attribute minimised by the search
    #[arg(short, long)]
    pub cost: String,

    /// Link attribute summed along each path, may be repeated
    #[arg(short, long = "skim")]
    pub skims: Vec<String>,

    /// Never route through centroids other than the origin
    #[arg(long)]
    pub block_centroids: bool,
}

impl QueryArgs {
    pub fn configure<'g>(&self, graph: &'g Graph) -> Result<CostConfiguration<'g>, anyhow::Error> {
        let config = graph
            .configure(&self.cost, &self.skims)?
            .block_centroid_flows(self.block_centroids);
        Ok(config)
    }
}

fn is_compiled(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("bin"))
}

pub fn load_graph(path: &Path) -> Result<Graph, anyhow::Error> {
    info!("Loading graph from {}", path.display());
    let graph = if is_compiled(path) {
        Graph::from_file(path)?
    } else {
        Graph::from_network_json(path)?
    };
    Ok(graph)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use super::*;

    pub(crate) fn fixture_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../crates/milepost_core/tests/fixtures/test_network.json")
    }

    #[test]
    fn test_is_compiled() {
        assert!(is_compiled(Path::new("graph.bin")));
        assert!(is_compiled(Path::new("out/GRAPH.BIN")));
        assert!(!is_compiled(Path::new("network.json")));
        assert!(!is_compiled(Path::new("network")));
    }

    #[test]
    fn test_load_json_graph() {
        let graph = load_graph(&fixture_path()).unwrap();
        assert_eq!(graph.node_count(), 8);
    }

    #[test]
    fn test_unknown_cost_field() {
        let graph = load_graph(&fixture_path()).unwrap();
        let args = QueryArgs {
            graph: fixture_path(),
            cost: "speed".to_string(),
            skims: Vec::new(),
            block_centroids: false,
        };
        assert!(args.configure(&graph).is_err());
    }
}
