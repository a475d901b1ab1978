use super::result::AggregateResult;
use super::result::ResultDocument;
use crate::config::{RunArguments, SimulationParams};
use crate::error::{LfResult, LineupForgeError};
use crate::lineup::LineupIndexer;
use crate::stats::StatsDocument;
use crate::simulation::{EvaluationTask, OutcomeGenerator, TaskResult};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

pub struct OptimizationOptions {
    pub games: usize,
    pub innings: usize,
    pub num_threads: usize,
    /// Upper bound on submitted but not yet drained evaluations.
    pub task_buffer: usize,
    pub seed: Option<u64>,
}

impl From<&SimulationParams> for OptimizationOptions {
    fn from(params: &SimulationParams) -> Self {
        Self {
            games: params.games,
            innings: params.innings,
            num_threads: params.threads,
            task_buffer: params.task_buffer,
            seed: params.seed,
        }
    }
}

/// Receives every snapshot the engine publishes.
///
/// `update` sees each fold exactly once. `complete` is called once at the end of a finished run
/// with the snapshot the last `update` already carried; it is not followed or preceded by a
/// repeated `update`. A run resumed from a finished checkpoint calls only `complete`.
///
/// An error from either method aborts the run.
pub trait ProgressSink: Send {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()>;

    /// Does nothing unless the sink needs a final flush.
    fn complete(&mut self, _snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        Ok(())
    }
}

/// Drops every snapshot.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn update(&mut self, _snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        Ok(())
    }
}

impl<A: ProgressSink, B: ProgressSink> ProgressSink for (A, B) {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.0.update(snapshot)?;
        self.1.update(snapshot)
    }

    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        self.0.complete(snapshot)?;
        self.1.complete(snapshot)
    }
}

impl<S: ProgressSink + ?Sized> ProgressSink for Box<S> {
    fn update(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        (**self).update(snapshot)
    }

    fn complete(&mut self, snapshot: &Arc<AggregateResult>) -> LfResult<()> {
        (**self).complete(snapshot)
    }
}

/// Cooperative interrupt. Raising it makes the engine stop after the snapshot it is folding.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

type Pending = (u64, Receiver<LfResult<TaskResult>>);

/// Scores every lineup of an index space by Monte Carlo simulation.
pub struct ExhaustiveOptimizer {
    indexer: Arc<LineupIndexer>,
    generator: Arc<OutcomeGenerator>,
    options: OptimizationOptions,
    seed: u64,
}

impl ExhaustiveOptimizer {
    pub fn new(indexer: LineupIndexer, options: OptimizationOptions) -> LfResult<Self> {
        if options.games == 0 || options.innings == 0 {
            return Err(LineupForgeError::Config(
                "games and innings must both be at least 1".to_string(),
            ));
        }
        if options.num_threads == 0 || options.task_buffer == 0 {
            return Err(LineupForgeError::Config(
                "threads and task buffer must both be at least 1".to_string(),
            ));
        }

        let generator = OutcomeGenerator::new(&indexer.players())?;
        let seed = options.seed.unwrap_or_else(|| fastrand::u64(..));

        Ok(Self {
            indexer: Arc::new(indexer),
            generator: Arc::new(generator),
            options,
            seed,
        })
    }

    /// Selects the players named in `args` and builds the index space for its lineup type.
    pub fn from_arguments(stats: &StatsDocument, args: &RunArguments) -> LfResult<Self> {
        args.params.validate()?;
        let players = stats.select(&args.players)?;
        let indexer = LineupIndexer::new(args.lineup_type, players)?;
        Self::new(indexer, OptimizationOptions::from(&args.params))
    }

    /// Turns a stored result document into a starting snapshot for this optimizer.
    pub fn resume_point(&self, doc: ResultDocument) -> LfResult<AggregateResult> {
        let prior = AggregateResult::from_document(doc, &self.indexer, self.seed)?;
        if let Some(requested) = self.options.seed {
            if requested != prior.seed() {
                warn!(
                    requested,
                    checkpoint = prior.seed(),
                    "Resuming with the checkpoint's seed"
                );
            }
        }
        Ok(prior)
    }

    pub fn indexer(&self) -> &LineupIndexer {
        &self.indexer
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Starting snapshot: the prior checkpoint when given, otherwise an empty result.
    fn starting_point(&self, prior: Option<&AggregateResult>) -> LfResult<AggregateResult> {
        match prior {
            Some(p) => {
                p.check_resumable(&self.indexer)?;
                Ok(p.clone())
            }
            None => Ok(AggregateResult::empty(
                self.indexer.lineup_type(),
                self.indexer.size(),
                self.seed,
            )),
        }
    }

    /// Evaluates every lineup index not yet covered by `prior`, in order.
    ///
    /// At most `task_buffer` evaluations are in flight. Results are folded strictly in index order,
    /// and each fold is published to `sink`. Returns the last snapshot, which is complete unless
    /// `stop` was raised.
    pub fn run<S: ProgressSink + ?Sized>(
        &self,
        prior: Option<&AggregateResult>,
        sink: &mut S,
        stop: &StopSignal,
    ) -> LfResult<Arc<AggregateResult>> {
        let opts = &self.options;
        let start = self.starting_point(prior)?;
        let total = start.count_total();
        // A resumed run keeps the seed it started with so every index sees the same stream
        let run_seed = start.seed();
        let elapsed_before = start.elapsed_ms();
        let mut latest = Arc::new(start);

        info!(
            lineup_type = %self.indexer.lineup_type(),
            total,
            resume_from = latest.count_completed(),
            games = opts.games,
            innings = opts.innings,
            threads = opts.num_threads,
            seed = run_seed,
            "Starting exhaustive lineup evaluation"
        );

        if latest.is_complete() {
            info!("Nothing left to evaluate");
            sink.complete(&latest)?;
            return Ok(latest);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.num_threads)
            .thread_name(|i| format!("lineup-worker-{}", i))
            .build()
            .map_err(|e| LineupForgeError::Config(format!("Cannot start worker pool: {}", e)))?;

        // Queued tasks check this before simulating so an early exit does not keep the pool busy
        let abandoned = Arc::new(AtomicBool::new(false));
        let started = Instant::now();
        let mut next_index = latest.count_completed();
        let mut in_flight: VecDeque<Pending> = VecDeque::with_capacity(opts.task_buffer);

        let outcome = (|| -> LfResult<()> {
            while in_flight.len() < opts.task_buffer && next_index < total {
                in_flight.push_back(self.submit(&pool, next_index, run_seed, &abandoned)?);
                next_index += 1;
            }

            // Waiting on the oldest task keeps folds in index order
            while let Some((index, receiver)) = in_flight.pop_front() {
                if stop.is_raised() {
                    warn!(
                        completed = latest.count_completed(),
                        total, "Stop requested, leaving the run resumable"
                    );
                    return Ok(());
                }

                let result = receiver.recv().map_err(|_| LineupForgeError::TaskFailed {
                    index,
                    reason: "worker exited without reporting".to_string(),
                })??;
                debug_assert_eq!(result.index, index);

                let elapsed =
                    elapsed_before.saturating_add(started.elapsed().as_millis() as u64);
                latest = Arc::new(latest.fold(&result, elapsed));
                sink.update(&latest)?;

                if next_index < total {
                    in_flight.push_back(self.submit(&pool, next_index, run_seed, &abandoned)?);
                    next_index += 1;
                }
            }
            Ok(())
        })();

        abandoned.store(true, Ordering::SeqCst);
        outcome?;

        if latest.is_complete() {
            info!(
                score = latest.score(),
                elapsed_ms = latest.elapsed_ms(),
                "Evaluation complete"
            );
            sink.complete(&latest)?;
        }
        Ok(latest)
    }

    fn submit(
        &self,
        pool: &rayon::ThreadPool,
        index: u64,
        run_seed: u64,
        abandoned: &Arc<AtomicBool>,
    ) -> LfResult<Pending> {
        let lineup = self.indexer.get_lineup(index).ok_or_else(|| {
            LineupForgeError::TaskFailed {
                index,
                reason: "index outside the search space".to_string(),
            }
        })?;
        let task = EvaluationTask::new(
            index,
            lineup,
            self.options.games,
            self.options.innings,
            run_seed,
            self.generator.clone(),
        );

        let (tx, rx) = mpsc::channel();
        let abandoned = abandoned.clone();
        pool.spawn(move || {
            if abandoned.load(Ordering::Relaxed) {
                return;
            }
            // Only unwinding builds get here on a panic; with panic = "abort" the process exits
            let result = match catch_unwind(AssertUnwindSafe(|| task.run())) {
                Ok(Ok(done)) => Ok(done),
                Ok(Err(e)) => Err(LineupForgeError::TaskFailed {
                    index,
                    reason: e.to_string(),
                }),
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "evaluation panicked".to_string());
                    Err(LineupForgeError::TaskFailed { index, reason })
                }
            };
            // The receiver is gone once the run has been abandoned
            let _ = tx.send(result);
        });
        debug!(index, "Submitted lineup");
        Ok((index, rx))
    }
}
