use crate::config::RunArguments;
use crate::error::{LfResult, LineupForgeError};
use crate::optimizer::{AggregateResult, Histogram, ResultDocument};
use crate::stats::StatsDocument;
use serde::{Deserialize, Serialize};

/// One newline-terminated JSON message between a worker and the peer that feeds it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "command", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    /// Worker is connected and waiting for a job.
    Ready,
    /// Job description sent by the peer.
    Data {
        stats: StatsDocument,
        arguments: RunArguments,
        #[serde(default)]
        prior: Option<ResultDocument>,
    },
    /// Intermediate snapshot, doubles as a resume point.
    InProgress { result: ResultDocument },
    Complete {
        lineup: Vec<String>,
        score: f64,
        histogram: Histogram,
        total: u64,
        complete: u64,
    },
    Error { message: String },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ready => "READY",
            Command::Data { .. } => "DATA",
            Command::InProgress { .. } => "IN_PROGRESS",
            Command::Complete { .. } => "COMPLETE",
            Command::Error { .. } => "ERROR",
        }
    }

    pub fn in_progress(snapshot: &AggregateResult) -> Self {
        Command::InProgress {
            result: snapshot.to_document(),
        }
    }

    pub fn complete(snapshot: &AggregateResult) -> Self {
        Command::Complete {
            lineup: snapshot.lineup().map(|l| l.ids()).unwrap_or_default(),
            score: snapshot.score(),
            histogram: snapshot.histogram().clone(),
            total: snapshot.count_total(),
            complete: snapshot.count_completed(),
        }
    }

    /// Serializes to a single line, newline included.
    pub fn encode(&self) -> LfResult<String> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn decode(line: &str) -> LfResult<Self> {
        serde_json::from_str(line.trim()).map_err(|e| {
            LineupForgeError::Protocol(format!("Malformed command '{}': {}", line.trim(), e))
        })
    }
}
