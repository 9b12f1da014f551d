use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use milepost_core::{LinkId, NodeId, PathResult, ShortestPathEngine};
use serde::Serialize;
use tracing::info;

use crate::graph_loader::{QueryArgs, load_graph};

#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    #[arg(long)]
    pub origin: NodeId,

    #[arg(long)]
    pub destination: NodeId,

    /// Print the path as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PathOutput<'a> {
    origin: NodeId,
    destination: NodeId,
    cost: Option<f64>,
    path: &'a [LinkId],
    path_nodes: &'a [NodeId],
    milepost: &'a [f64],
    skims: Vec<(&'a str, f64)>,
}

fn path_table(result: &PathResult) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["#", "Link", "Direction", "From", "To", "Milepost"]);

    let nodes = result.path_nodes();
    for (index, (link, direction)) in result
        .path()
        .iter()
        .zip(result.path_directions())
        .enumerate()
    {
        table.add_row(vec![
            (index + 1).to_string(),
            link.to_string(),
            format!("{direction:?}"),
            nodes[index].to_string(),
            nodes[index + 1].to_string(),
            result.milepost()[index + 1].to_string(),
        ]);
    }

    table
}

pub fn run(args: PathArgs) -> Result<(), anyhow::Error> {
    let graph = load_graph(&args.query.graph)?;
    let config = args.query.configure(&graph)?;

    let mut engine = ShortestPathEngine::new();
    let mut result = PathResult::prepared(&config);
    let stats = engine.run(&config, args.origin, Some(args.destination), &mut result)?;

    info!(
        "Settled {} nodes in {:?}",
        stats.settled_nodes, stats.duration
    );

    if args.json {
        let output = PathOutput {
            origin: args.origin,
            destination: args.destination,
            cost: result.path_cost(),
            path: result.path(),
            path_nodes: result.path_nodes(),
            milepost: result.milepost(),
            skims: result.skims().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if !result.has_path() {
        println!("No path from {} to {}", args.origin, args.destination);
        return Ok(());
    }

    println!("{}", path_table(&result));

    let mut totals = Table::new();
    totals.load_preset(UTF8_FULL).set_header(vec!["Field", "Total"]);
    if let Some(cost) = result.path_cost() {
        totals.add_row(vec![config.cost_field().to_string(), cost.to_string()]);
    }
    for (field, total) in result.skims() {
        totals.add_row(vec![field.to_string(), total.to_string()]);
    }
    println!("{totals}");

    Ok(())
}
