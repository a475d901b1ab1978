use super::histogram::Histogram;
use crate::error::{LfResult, LineupForgeError};
use crate::lineup::{Lineup, LineupIndexer, LineupType};
use crate::simulation::TaskResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Immutable snapshot of a run. Every fold produces a new value; published snapshots are shared
/// behind an `Arc` and never change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    lineup_type: LineupType,
    lineup: Option<Lineup>,
    score: f64,
    count_total: u64,
    count_completed: u64,
    elapsed_ms: u64,
    seed: u64,
    histogram: Histogram,
}

impl AggregateResult {
    /// Nothing evaluated yet.
    pub fn empty(lineup_type: LineupType, count_total: u64, seed: u64) -> Self {
        Self {
            lineup_type,
            lineup: None,
            score: 0.0,
            count_total,
            count_completed: 0,
            elapsed_ms: 0,
            seed,
            histogram: Histogram::new(),
        }
    }

    /// Folds one finished evaluation into a new snapshot.
    ///
    /// The best lineup only moves on a strictly greater score, so ties keep the lower index.
    pub fn fold(&self, result: &TaskResult, elapsed_ms: u64) -> Self {
        let mut histogram = self.histogram.clone();
        histogram.record(result.score);

        let improved = self.lineup.is_none() || result.score > self.score;
        let (lineup, score) = if improved {
            (Some(result.lineup.clone()), result.score)
        } else {
            (self.lineup.clone(), self.score)
        };

        Self {
            lineup_type: self.lineup_type,
            lineup,
            score,
            count_total: self.count_total,
            count_completed: self.count_completed + 1,
            elapsed_ms,
            seed: self.seed,
            histogram,
        }
    }

    pub fn lineup_type(&self) -> LineupType {
        self.lineup_type
    }

    pub fn lineup(&self) -> Option<&Lineup> {
        self.lineup.as_ref()
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn count_total(&self) -> u64 {
        self.count_total
    }

    pub fn count_completed(&self) -> u64 {
        self.count_completed
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn histogram(&self) -> &Histogram {
        &self.histogram
    }

    pub fn is_complete(&self) -> bool {
        self.count_completed >= self.count_total
    }

    pub fn progress_percent(&self) -> f64 {
        if self.count_total == 0 {
            return 100.0;
        }
        self.count_completed as f64 * 100.0 / self.count_total as f64
    }

    /// Estimated time left at the average rate seen so far.
    pub fn remaining_ms(&self) -> Option<u64> {
        if self.count_completed == 0 {
            return None;
        }
        let remaining = self.count_total.saturating_sub(self.count_completed);
        let per_lineup = self.elapsed_ms as f64 / self.count_completed as f64;
        Some((per_lineup * remaining as f64).round() as u64)
    }

    /// Checks that a prior snapshot can seed a run over `indexer`.
    pub fn check_resumable(&self, indexer: &LineupIndexer) -> LfResult<()> {
        if self.lineup_type != indexer.lineup_type() {
            return Err(LineupForgeError::ResumeMismatch(format!(
                "Checkpoint was taken for lineup type {}, this run uses {}",
                self.lineup_type,
                indexer.lineup_type()
            )));
        }
        if self.count_total != indexer.size() {
            return Err(LineupForgeError::ResumeMismatch(format!(
                "Checkpoint covers {} lineups, this run has {}",
                self.count_total,
                indexer.size()
            )));
        }
        if self.count_completed > self.count_total {
            return Err(LineupForgeError::ResumeMismatch(format!(
                "Checkpoint claims {} completed lineups out of {}",
                self.count_completed, self.count_total
            )));
        }
        if self.histogram.total() != self.count_completed {
            return Err(LineupForgeError::ResumeMismatch(format!(
                "Checkpoint histogram holds {} entries but {} lineups are marked complete",
                self.histogram.total(),
                self.count_completed
            )));
        }
        Ok(())
    }

    pub fn to_document(&self) -> ResultDocument {
        ResultDocument::MonteCarloExhaustive(ExhaustiveResult {
            lineup_type: self.lineup_type,
            lineup: self.lineup.as_ref().map(Lineup::ids),
            lineup_score: self.score,
            count_total: self.count_total,
            count_completed: self.count_completed,
            elapsed_time_ms: self.elapsed_ms,
            seed: Some(self.seed),
            histogram: self.histogram.clone(),
        })
    }

    /// Rebuilds a snapshot from a stored document, resolving lineup ids against the players of
    /// `indexer` and checking that the document describes the same search space.
    pub fn from_document(
        doc: ResultDocument,
        indexer: &LineupIndexer,
        fallback_seed: u64,
    ) -> LfResult<Self> {
        let ResultDocument::MonteCarloExhaustive(data) = doc;

        let players: HashMap<String, _> = indexer
            .players()
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        let lineup = match data.lineup {
            None => None,
            Some(ids) => {
                let resolved = ids
                    .iter()
                    .map(|id| {
                        players.get(id).map(Arc::clone).ok_or_else(|| {
                            LineupForgeError::ResumeMismatch(format!(
                                "Checkpoint lineup names unknown player '{}'",
                                id
                            ))
                        })
                    })
                    .collect::<LfResult<Vec<_>>>()?;
                Some(Lineup::new(resolved))
            }
        };

        let result = Self {
            lineup_type: data.lineup_type,
            lineup,
            score: data.lineup_score,
            count_total: data.count_total,
            count_completed: data.count_completed,
            elapsed_ms: data.elapsed_time_ms,
            seed: data.seed.unwrap_or(fallback_seed),
            histogram: data.histogram,
        };
        result.check_resumable(indexer)?;
        Ok(result)
    }
}

/// Persisted and transmitted form of a result, tagged by the optimizer that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "optimizer")]
pub enum ResultDocument {
    #[serde(rename = "MONTE_CARLO_EXHAUSTIVE")]
    MonteCarloExhaustive(ExhaustiveResult),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhaustiveResult {
    pub lineup_type: LineupType,
    /// Player ids in batting order; absent until the first lineup is evaluated.
    #[serde(default)]
    pub lineup: Option<Vec<String>>,
    pub lineup_score: f64,
    pub count_total: u64,
    pub count_completed: u64,
    #[serde(default)]
    pub elapsed_time_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub histogram: Histogram,
}

impl ResultDocument {
    pub fn from_json(json: &str) -> LfResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> LfResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json_pretty(&self) -> LfResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
