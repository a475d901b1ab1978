pub mod game;
pub mod task;

pub use self::game::simulate_game;
pub use self::task::{EvaluationTask, TaskResult};

use crate::error::{LfResult, LineupForgeError};
use crate::lineup::Lineup;
use crate::stats::Player;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use strum::{EnumCount, IntoEnumIterator};
use strum_macros::{EnumCount as EnumCountMacro, EnumIter};

/// Result of a single plate appearance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumCountMacro,
)]
pub enum Outcome {
    Out,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl Outcome {
    /// Bases the batter advances. Zero for an out.
    pub fn bases(&self) -> usize {
        match self {
            Outcome::Out => 0,
            Outcome::Single => 1,
            Outcome::Double => 2,
            Outcome::Triple => 3,
            Outcome::HomeRun => 4,
        }
    }
}

/// Cumulative outcome thresholds for one player.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeDistribution {
    cumulative: [f64; Outcome::COUNT],
}

impl OutcomeDistribution {
    fn from_counts(counts: [u32; Outcome::COUNT]) -> Option<Self> {
        let total: u64 = counts.iter().map(|&c| c as u64).sum();
        if total == 0 {
            return None;
        }

        let mut cumulative = [0.0; Outcome::COUNT];
        let mut running = 0u64;
        for (slot, &count) in cumulative.iter_mut().zip(counts.iter()) {
            running += count as u64;
            *slot = running as f64 / total as f64;
        }
        Some(Self { cumulative })
    }

    pub fn out_probability(&self) -> f64 {
        self.cumulative[0]
    }

    /// Maps a uniform draw in `[0, 1)` to the first outcome whose cumulative share exceeds it.
    pub fn outcome_for(&self, draw: f64) -> Outcome {
        Outcome::iter()
            .zip(self.cumulative.iter())
            .find(|&(_, &threshold)| draw < threshold)
            .map(|(outcome, _)| outcome)
            // draw == 1.0 can only come from a hand-fed value
            .unwrap_or(Outcome::HomeRun)
    }

    pub fn sample(&self, rng: &mut fastrand::Rng) -> Outcome {
        self.outcome_for(rng.f64())
    }
}

/// Per-player outcome distributions, built once per run and shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct OutcomeGenerator {
    distributions: HashMap<String, OutcomeDistribution>,
}

impl OutcomeGenerator {
    pub fn new(players: &[Arc<Player>]) -> LfResult<Self> {
        let mut distributions = HashMap::with_capacity(players.len());
        for p in players {
            let dist = OutcomeDistribution::from_counts(p.outcome_counts()).ok_or_else(|| {
                LineupForgeError::Config(format!(
                    "Player '{}' has no recorded plate appearances",
                    p.display_name()
                ))
            })?;
            distributions.insert(p.id.clone(), dist);
        }

        if !distributions.is_empty() && distributions.values().all(|d| d.out_probability() == 0.0)
        {
            return Err(LineupForgeError::Config(
                "No player in the lineup has ever made an out, so an inning could never end"
                    .to_string(),
            ));
        }

        Ok(Self { distributions })
    }

    pub fn distribution(&self, player_id: &str) -> Option<&OutcomeDistribution> {
        self.distributions.get(player_id)
    }

    /// Distributions in batting order for one lineup.
    pub fn distributions_for(&self, lineup: &Lineup) -> LfResult<Vec<&OutcomeDistribution>> {
        lineup
            .players()
            .iter()
            .map(|p| {
                self.distribution(&p.id).ok_or_else(|| {
                    LineupForgeError::Config(format!(
                        "No outcome distribution for player '{}'",
                        p.id
                    ))
                })
            })
            .collect()
    }
}
