use crate::error::{LfResult, LineupForgeError};
use crate::lineup::LineupType;
use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GAMES_TO_SIMULATE: usize = 10_000;
pub const DEFAULT_INNINGS_PER_GAME: usize = 7;
pub const DEFAULT_TASK_BUFFER: usize = 1_000;
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 1_000;
pub const DEFAULT_UPDATE_INTERVAL_LINEUPS: u64 = 1;

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SimulationParams {
    /// Games simulated per candidate lineup
    #[arg(short = 'g', long, default_value_t = DEFAULT_GAMES_TO_SIMULATE)]
    pub games: usize,

    /// Innings per simulated game
    #[arg(short = 'i', long, default_value_t = DEFAULT_INNINGS_PER_GAME)]
    pub innings: usize,

    /// Worker threads
    #[arg(short = 't', long, default_value_t = default_threads())]
    pub threads: usize,

    /// Maximum number of lineups in flight at once
    #[arg(long, default_value_t = DEFAULT_TASK_BUFFER)]
    pub task_buffer: usize,

    /// Run seed; every lineup index derives its own stream from it
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Minimum time between progress reports
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL_MS)]
    pub update_interval_ms: u64,

    /// Minimum number of newly evaluated lineups between progress reports
    #[arg(long, default_value_t = DEFAULT_UPDATE_INTERVAL_LINEUPS)]
    pub update_interval_lineups: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            games: DEFAULT_GAMES_TO_SIMULATE,
            innings: DEFAULT_INNINGS_PER_GAME,
            threads: default_threads(),
            task_buffer: DEFAULT_TASK_BUFFER,
            seed: None,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            update_interval_lineups: DEFAULT_UPDATE_INTERVAL_LINEUPS,
        }
    }
}

impl SimulationParams {
    pub fn validate(&self) -> LfResult<()> {
        let checks = [
            (self.games, "games"),
            (self.innings, "innings"),
            (self.threads, "threads"),
            (self.task_buffer, "task_buffer"),
        ];
        for (value, name) in checks {
            if value == 0 {
                return Err(LineupForgeError::Config(format!(
                    "'{}' must be at least 1",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Everything a run needs besides the statistics themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunArguments {
    pub lineup_type: LineupType,
    /// Player ids or names; empty selects every player in the stats document.
    #[serde(default)]
    pub players: Vec<String>,
    #[serde(default)]
    pub params: SimulationParams,
}

impl Default for RunArguments {
    fn default() -> Self {
        Self {
            lineup_type: LineupType::Ordinary,
            players: Vec::new(),
            params: SimulationParams::default(),
        }
    }
}
