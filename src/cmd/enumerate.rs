use crate::reports;
use clap::Args;
use lineupforge::error::LfResult;
use lineupforge::lineup::{LineupIndexer, LineupType};
use lineupforge::stats::StatsDocument;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct EnumerateArgs {
    /// Player statistics JSON
    #[arg(short = 's', long)]
    pub stats: PathBuf,

    #[arg(short = 'T', long, default_value = "ORDINARY")]
    pub lineup_type: LineupType,

    #[arg(short = 'L', long, value_delimiter = ',')]
    pub players: Vec<String>,

    /// First index to print
    #[arg(long, default_value_t = 0)]
    pub start: u64,

    /// How many lineups to print
    #[arg(short = 'n', long, default_value_t = 10)]
    pub count: u64,

    /// Print each lineup as a table instead of one line
    #[arg(long, default_value_t = false)]
    pub table: bool,
}

pub fn run(args: EnumerateArgs) -> LfResult<()> {
    let stats = StatsDocument::load_from_file(&args.stats)?;
    let indexer = LineupIndexer::new(args.lineup_type, stats.select(&args.players)?)?;
    println!("{} lineups of type {}", indexer.size(), indexer.lineup_type());

    let end = args.start.saturating_add(args.count).min(indexer.size());
    for index in args.start..end {
        let Some(lineup) = indexer.get_lineup(index) else {
            break;
        };
        if args.table {
            reports::print_lineup(&format!("Lineup {}", index), &lineup);
        } else {
            println!("{:>8}  {}", index, lineup);
        }
    }
    Ok(())
}
