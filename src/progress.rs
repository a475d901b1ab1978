//! Local progress sinks: an in-memory latest-result handle, throttled console logging and an
//! on-disk checkpoint.

use crate::error::LfResult;
use crate::optimizer::{AggregateResult, ProgressSink};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Rate limiter for intermediate snapshots.
///
/// A snapshot passes once `interval` has elapsed since the last one that passed and at least
/// `min_lineups` new lineups have been folded in. The first snapshot always passes.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    min_lineups: u64,
    last: Option<(Instant, u64)>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            min_lineups: 1,
            last: None,
        }
    }

    pub fn with_min_lineups(mut self, min_lineups: u64) -> Self {
        self.min_lineups = min_lineups.max(1);
        self
    }

    pub fn ready(&mut self, completed: u64) -> bool {
        let now = Instant::now();
        let pass = match self.last {
            None => true,
            Some((at, count)) => {
                now.duration_since(at) >= self.interval
                    && completed.saturating_sub(count) >= self.min_lineups
            }
        };
        if pass {
            self.last = Some((now, completed));
        }
        pass
    }
}

/// Shared handle to the most recent snapshot.
///
/// The writer swaps the `Arc` under a short lock; readers clone it out and read without locking.
#[derive(Debug, Clone, Default)]
pub struct LatestResult {
    slot: Arc<Mutex<Option<Arc<AggregateResult>>>>,
}

impl LatestResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Arc<AggregateResult>> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, snapshot: &Arc<AggregateResult>) {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(snapshot.clone());
    }
}

impl ProgressSink for LatestResult {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.set(snapshot);
        Ok(())
    }

    // A finished checkpoint is only ever handed to `complete`
    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.set(snapshot);
        Ok(())
    }
}

/// Logs a progress line at most once per throttle window.
pub struct ConsoleSink {
    throttle: Throttle,
    started: Instant,
    first_completed: Option<u64>,
}

impl ConsoleSink {
    pub fn new(interval: Duration) -> Self {
        Self {
            throttle: Throttle::new(interval),
            started: Instant::now(),
            first_completed: None,
        }
    }

    pub fn with_min_lineups(mut self, min_lineups: u64) -> Self {
        self.throttle = self.throttle.with_min_lineups(min_lineups);
        self
    }

    /// Lineups per second since this sink saw its first snapshot.
    fn rate(&mut self, completed: u64) -> f64 {
        let first = *self.first_completed.get_or_insert(completed);
        let secs = self.started.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        completed.saturating_sub(first) as f64 / secs
    }
}

impl ProgressSink for ConsoleSink {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        let rate = self.rate(snapshot.count_completed());
        if !self.throttle.ready(snapshot.count_completed()) {
            return Ok(());
        }

        let eta = snapshot
            .remaining_ms()
            .map(|ms| format!("{}s", ms / 1000))
            .unwrap_or_else(|| "?".to_string());
        info!(
            "{:>6.2}% | {}/{} | best {:.3} | {:.1} lineups/s | eta {}",
            snapshot.progress_percent(),
            snapshot.count_completed(),
            snapshot.count_total(),
            snapshot.score(),
            rate,
            eta
        );
        Ok(())
    }

    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        info!(
            lineups = snapshot.count_total(),
            score = snapshot.score(),
            elapsed_ms = snapshot.elapsed_ms(),
            "All lineups evaluated"
        );
        Ok(())
    }
}

/// Keeps a result document on disk that a later run can resume from.
pub struct CheckpointSink {
    path: PathBuf,
    throttle: Throttle,
}

impl CheckpointSink {
    pub fn new<P: AsRef<Path>>(path: P, interval: Duration) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            throttle: Throttle::new(interval),
        }
    }

    pub fn with_min_lineups(mut self, min_lineups: u64) -> Self {
        self.throttle = self.throttle.with_min_lineups(min_lineups);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes next to the target and renames over it, so readers never see a partial file.
    pub fn write(&self, snapshot: &AggregateResult) -> LfResult<()> {
        let json = snapshot.to_document().to_json_pretty()?;
        let mut tmp: OsString = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        debug!(
            path = %self.path.display(),
            completed = snapshot.count_completed(),
            "Checkpoint written"
        );
        Ok(())
    }
}

impl ProgressSink for CheckpointSink {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        if self.throttle.ready(snapshot.count_completed()) {
            self.write(snapshot)?;
        }
        Ok(())
    }

    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.write(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineup::{Lineup, LineupType};
    use crate::optimizer::ResultDocument;
    use crate::simulation::TaskResult;

    fn snapshot(completed: u64) -> Arc<AggregateResult> {
        let lineup = Lineup::new(vec![]);
        let snap = (0..completed).fold(
            AggregateResult::empty(LineupType::Ordinary, 10, 0),
            |acc, i| {
                let task = TaskResult {
                    index: i,
                    score: 0.0,
                    lineup: lineup.clone(),
                };
                acc.fold(&task, i)
            },
        );
        Arc::new(snap)
    }

    #[test]
    fn throttle_passes_first_and_then_waits() {
        let mut t = Throttle::new(Duration::from_secs(3600));
        assert!(t.ready(1));
        assert!(!t.ready(2));
        assert!(!t.ready(500));
    }

    #[test]
    fn zero_interval_throttle_respects_lineup_step() {
        let mut t = Throttle::new(Duration::ZERO).with_min_lineups(5);
        assert!(t.ready(0));
        assert!(!t.ready(4));
        assert!(t.ready(5));
        assert!(!t.ready(6));
    }

    #[test]
    fn latest_result_holds_newest_snapshot() {
        let mut latest = LatestResult::new();
        let reader = latest.clone();
        assert!(reader.get().is_none());
        latest.update(&snapshot(1)).unwrap();
        latest.update(&snapshot(2)).unwrap();
        assert_eq!(reader.get().unwrap().count_completed(), 2);
    }

    #[test]
    fn latest_result_keeps_the_completed_snapshot() {
        let mut latest = LatestResult::new();
        latest.complete(&snapshot(10)).unwrap();
        assert!(latest.get().unwrap().is_complete());
    }

    #[test]
    fn checkpoint_waits_for_the_lineup_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("step.json");
        let mut sink = CheckpointSink::new(&path, Duration::ZERO).with_min_lineups(4);

        for completed in 1..=4 {
            sink.update(&snapshot(completed)).unwrap();
        }
        let ResultDocument::MonteCarloExhaustive(data) =
            ResultDocument::load_from_file(&path).unwrap();
        assert_eq!(data.count_completed, 1);

        sink.update(&snapshot(5)).unwrap();
        let ResultDocument::MonteCarloExhaustive(data) =
            ResultDocument::load_from_file(&path).unwrap();
        assert_eq!(data.count_completed, 5);
    }

    #[test]
    fn checkpoint_is_replaced_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut sink = CheckpointSink::new(&path, Duration::from_secs(3600));

        sink.update(&snapshot(1)).unwrap();
        // Throttled: the file still holds the first snapshot
        sink.update(&snapshot(2)).unwrap();
        let doc = ResultDocument::load_from_file(&path).unwrap();
        let ResultDocument::MonteCarloExhaustive(data) = doc;
        assert_eq!(data.count_completed, 1);

        sink.complete(&snapshot(3)).unwrap();
        let ResultDocument::MonteCarloExhaustive(data) =
            ResultDocument::load_from_file(&path).unwrap();
        assert_eq!(data.count_completed, 3);
        assert!(!dir.path().join("run.json.tmp").exists());
    }
}
