//! Trellis CLI - graph analysis demos
//!
//! Each subcommand builds a small fixed graph, runs the matching analyses
//! from `trellis-graph`, and prints the results as coloured text or JSON.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trellis_graph::AnalysisConfig;

mod commands;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(author = "Trellis Contributors")]
#[command(version)]
#[command(about = "Weighted graph analysis demos", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    /// JSON file with analysis settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// City roads: fastest route, bottleneck roads, signal timings
    City,

    /// Computer network: critical links and cheapest cabling
    Network,

    /// Social network: influence and communities
    Social,

    /// Item recommendations from shared interactions
    Recommend {
        /// User to recommend items for
        #[arg(short, long, default_value = "0")]
        user: usize,
    },

    /// NPC pathfinding on a 5x5 grid
    Grid,

    /// Run every demo
    All,
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::City => commands::city(cli.json),
        Commands::Network => commands::network(cli.json),
        Commands::Social => commands::social(&config, cli.json),
        Commands::Recommend { user } => commands::recommend(user, cli.json),
        Commands::Grid => commands::grid(cli.json),
        Commands::All => commands::all(&config, cli.json),
    });

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> commands::Result<AnalysisConfig> {
    match path {
        Some(path) => Ok(AnalysisConfig::load(path)?),
        None => Ok(AnalysisConfig::default()),
    }
}
