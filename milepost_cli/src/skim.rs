use std::path::PathBuf;

use clap::Args;
use milepost_core::{NodeId, SkimRunner};
use tracing::info;

use crate::graph_loader::{QueryArgs, load_graph};

#[derive(Args)]
pub struct SkimArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Comma separated origin node ids
    #[arg(long, value_delimiter = ',', required = true)]
    pub origins: Vec<NodeId>,

    /// Comma separated destination node ids
    #[arg(long, value_delimiter = ',', required = true)]
    pub destinations: Vec<NodeId>,

    /// Worker threads, 0 uses one per core
    #[arg(short, long, env = "MILEPOST_THREADS", default_value_t = 0)]
    pub threads: usize,

    /// Write the matrix as JSON to this file instead of printing it
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: SkimArgs) -> Result<(), anyhow::Error> {
    let graph = load_graph(&args.query.graph)?;
    let config = args.query.configure(&graph)?;

    let matrix = SkimRunner::new(&config)
        .threads(args.threads)
        .run(&args.origins, &args.destinations)?;

    match args.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, serde_json::to_string_pretty(&matrix)?)?;
            info!("Wrote skim matrix to {}", output.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&matrix)?),
    }

    Ok(())
}
