use super::protocol::Command;
use crate::error::{LfResult, LineupForgeError};
use crate::optimizer::{AggregateResult, ProgressSink};
use crate::progress::Throttle;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

/// Queue depth between the engine thread and the socket writer.
pub const OUTBOUND_CAPACITY: usize = 16;

/// Streams snapshots to the socket writer task.
///
/// Intermediate snapshots never block the engine: when the writer falls behind, the new snapshot
/// is dropped because a later one will supersede it. The final COMPLETE waits for queue space.
pub struct NetworkSink {
    tx: mpsc::Sender<Command>,
    throttle: Throttle,
}

impl NetworkSink {
    pub fn new(tx: mpsc::Sender<Command>, interval: Duration) -> Self {
        Self {
            tx,
            throttle: Throttle::new(interval),
        }
    }

    pub fn with_min_lineups(mut self, min_lineups: u64) -> Self {
        self.throttle = self.throttle.with_min_lineups(min_lineups);
        self
    }

    fn closed() -> LineupForgeError {
        LineupForgeError::Sink("connection to the peer is closed".to_string())
    }
}

impl ProgressSink for NetworkSink {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        if self.tx.is_closed() {
            return Err(Self::closed());
        }
        if !self.throttle.ready(snapshot.count_completed()) {
            return Ok(());
        }

        match self.tx.try_send(Command::in_progress(snapshot)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                debug!(
                    completed = snapshot.count_completed(),
                    "Writer busy, skipping snapshot"
                );
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(Self::closed()),
        }
    }

    /// Must be called from a thread outside the async runtime.
    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.tx
            .blocking_send(Command::complete(snapshot))
            .map_err(|_| Self::closed())
    }
}
