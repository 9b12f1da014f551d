use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{compile::CompileArgs, path::PathArgs, skim::SkimArgs};

mod compile;
mod graph_loader;
mod path;
mod skim;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a JSON network and write the compiled graph
    Compile {
        #[command(flatten)]
        args: CompileArgs,
    },
    /// Compute the least-cost path between two nodes
    #[command(visible_alias = "p")]
    Path {
        #[command(flatten)]
        args: PathArgs,
    },
    /// Compute an origin-destination matrix of costs and skims
    #[command(visible_alias = "s")]
    Skim {
        #[command(flatten)]
        args: SkimArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Compile { args } => compile::run(args)?,
        Commands::Path { args } => path::run(args)?,
        Commands::Skim { args } => skim::run(args)?,
    }

    Ok(())
}
