//! Playoffs CLI - Command-line interface
//!
//! Commands:
//! - simulate: Play one postseason from standings (or resume a saved one)
//! - status: Print a saved bracket
//! - batch: Run many seeded postseasons and count titles

mod batch;
mod league;
mod report;
mod simulate;
mod status;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "playoffs")]
#[command(about = "Postseason bracket engine: play-in, conference rounds and Finals")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one postseason with random scores
    Simulate(simulate::SimulateArgs),
    /// Print a saved bracket
    Status(status::StatusArgs),
    /// Run many postseasons and count titles
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => simulate::run(args, cli.seed),
        Commands::Status(args) => status::run(args),
        Commands::Batch(args) => batch::run(args, cli.seed),
    }
}
