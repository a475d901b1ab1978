use clap::{Parser, Subcommand};
use std::process;
use tracing::error;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about = "Exhaustive batting lineup optimizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate every valid lineup and report the best one
    Optimize(cmd::optimize::OptimizeArgs),
    /// Take a job from a remote peer and stream results back
    Worker(cmd::worker::WorkerArgs),
    /// Print lineups by index
    Enumerate(cmd::enumerate::EnumerateArgs),
}

fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Optimize(args) => cmd::optimize::run(args),
        Commands::Worker(args) => cmd::worker::run(args),
        Commands::Enumerate(args) => cmd::enumerate::run(args),
    };

    if let Err(e) = outcome {
        error!("{}", e);
        process::exit(1);
    }
}
