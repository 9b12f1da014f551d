use std::path::PathBuf;

use clap::Args;
use milepost_core::{Graph, storage::read_network_json};
use tracing::info;

#[derive(Args)]
pub struct CompileArgs {
    /// Network source in JSON
    #[arg(short, long)]
    network: PathBuf,

    /// Where to write the compiled graph
    #[arg(short, long)]
    output: PathBuf,
}

pub fn run(args: CompileArgs) -> Result<(), anyhow::Error> {
    let source = read_network_json(&args.network)?;
    let graph = Graph::load(&source)?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    graph.save_to_file(&args.output)?;

    info!(
        "Compiled {} nodes and {} links into {}",
        graph.node_count(),
        graph.link_count(),
        args.output.display()
    );
    Ok(())
}
