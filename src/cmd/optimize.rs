use crate::reports;
use clap::Args;
use lineupforge::config::{RunArguments, SimulationParams};
use lineupforge::error::LfResult;
use lineupforge::lineup::{LineupIndexer, LineupType};
use lineupforge::optimizer::{ExhaustiveOptimizer, ResultDocument, StopSignal};
use lineupforge::progress::{CheckpointSink, ConsoleSink};
use lineupforge::stats::StatsDocument;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Player statistics JSON
    #[arg(short = 's', long)]
    pub stats: PathBuf,

    /// ORDINARY (1) or NO_CONSECUTIVE_FEMALES (3)
    #[arg(short = 'T', long, default_value = "ORDINARY")]
    pub lineup_type: LineupType,

    /// Comma separated player ids or names; all players when omitted
    #[arg(short = 'L', long, value_delimiter = ',')]
    pub players: Vec<String>,

    #[command(flatten)]
    pub params: SimulationParams,

    /// Keep a resumable result document at this path
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Continue from a previously saved result document
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Print the number of possible lineups and exit
    #[arg(long, default_value_t = false)]
    pub estimate_only: bool,
}

pub fn run(args: OptimizeArgs) -> LfResult<()> {
    info!("Loading stats: {}", args.stats.display());
    let stats = StatsDocument::load_from_file(&args.stats)?;
    let run_args = RunArguments {
        lineup_type: args.lineup_type,
        players: args.players,
        params: args.params,
    };

    if args.estimate_only {
        let indexer = LineupIndexer::new(run_args.lineup_type, stats.select(&run_args.players)?)?;
        let simulated_games = indexer.size() as f64 * run_args.params.games as f64;
        println!(
            "{} possible {} lineups ({:.3e} simulated games)",
            indexer.size(),
            run_args.lineup_type,
            simulated_games
        );
        return Ok(());
    }

    let optimizer = ExhaustiveOptimizer::from_arguments(&stats, &run_args)?;
    let prior = match &args.resume {
        Some(path) => {
            info!("Resuming from {}", path.display());
            Some(optimizer.resume_point(ResultDocument::load_from_file(path)?)?)
        }
        None => None,
    };

    let stop = StopSignal::new();
    super::watch_for_interrupt(stop.clone());

    let interval = Duration::from_millis(run_args.params.update_interval_ms);
    let step = run_args.params.update_interval_lineups;
    let console = ConsoleSink::new(interval).with_min_lineups(step);
    let result = match &args.checkpoint {
        Some(path) => {
            let checkpoint = CheckpointSink::new(path, interval).with_min_lineups(step);
            let mut sinks = (console, checkpoint);
            let result = optimizer.run(prior.as_ref(), &mut sinks, &stop)?;
            if !result.is_complete() {
                // Leave the exact stopping point on disk
                sinks.1.write(&result)?;
                info!("Checkpoint saved to {}", sinks.1.path().display());
            }
            result
        }
        None => {
            let mut sink = console;
            optimizer.run(prior.as_ref(), &mut sink, &stop)?
        }
    };

    reports::print_summary(&result);
    reports::print_histogram(&result);
    Ok(())
}
