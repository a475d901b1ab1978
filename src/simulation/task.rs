use super::{simulate_game, OutcomeGenerator};
use crate::error::LfResult;
use crate::lineup::Lineup;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub index: u64,
    /// Average runs per game.
    pub score: f64,
    pub lineup: Lineup,
}

/// One candidate lineup plus everything needed to score it.
#[derive(Debug, Clone)]
pub struct EvaluationTask {
    pub index: u64,
    pub lineup: Lineup,
    pub games: usize,
    pub innings: usize,
    pub seed: u64,
    pub generator: Arc<OutcomeGenerator>,
}

impl EvaluationTask {
    pub fn new(
        index: u64,
        lineup: Lineup,
        games: usize,
        innings: usize,
        run_seed: u64,
        generator: Arc<OutcomeGenerator>,
    ) -> Self {
        Self {
            index,
            lineup,
            games,
            innings,
            seed: task_seed(run_seed, index),
            generator,
        }
    }

    pub fn run(self) -> LfResult<TaskResult> {
        let order = self.generator.distributions_for(&self.lineup)?;
        let mut rng = fastrand::Rng::with_seed(self.seed);

        let total_runs: u64 = (0..self.games)
            .map(|_| simulate_game(&order, self.innings, &mut rng) as u64)
            .sum();

        let score = if self.games == 0 {
            0.0
        } else {
            total_runs as f64 / self.games as f64
        };

        Ok(TaskResult {
            index: self.index,
            score,
            lineup: self.lineup,
        })
    }
}

/// SplitMix64 finalizer over `(run seed, index)` so neighbouring indices get unrelated streams.
pub fn task_seed(run_seed: u64, index: u64) -> u64 {
    let mut z = run_seed ^ index.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{Player, PlayerGroup};

    fn setup() -> (Lineup, Arc<OutcomeGenerator>) {
        let players = vec![
            Arc::new(Player::new("a", PlayerGroup::A, [6, 2, 1, 0, 1])),
            Arc::new(Player::new("b", PlayerGroup::A, [7, 3, 0, 0, 0])),
            Arc::new(Player::new("c", PlayerGroup::A, [5, 2, 1, 1, 1])),
        ];
        let generator = Arc::new(OutcomeGenerator::new(&players).unwrap());
        (Lineup::new(players), generator)
    }

    #[test]
    fn same_seed_same_score() {
        let (lineup, generator) = setup();
        let a = EvaluationTask::new(4, lineup.clone(), 200, 7, 99, generator.clone())
            .run()
            .unwrap();
        let b = EvaluationTask::new(4, lineup, 200, 7, 99, generator)
            .run()
            .unwrap();
        assert_eq!(a.score, b.score);
        assert_eq!(a.index, 4);
    }

    #[test]
    fn neighbouring_indices_get_distinct_seeds() {
        assert_ne!(task_seed(0, 0), task_seed(0, 1));
        assert_ne!(task_seed(1, 0), task_seed(0, 0));
    }

    #[test]
    fn score_is_average_runs_per_game() {
        let (lineup, generator) = setup();
        let result = EvaluationTask::new(0, lineup, 50, 3, 5, generator)
            .run()
            .unwrap();
        assert!(result.score >= 0.0);
        assert!(result.score.is_finite());
    }

    #[test]
    fn slugger_and_out_make_three_runs_an_inning() {
        let players = vec![
            Arc::new(Player::new("slugger", PlayerGroup::A, [0, 0, 0, 0, 1])),
            Arc::new(Player::new("out", PlayerGroup::A, [1, 0, 0, 0, 0])),
        ];
        let generator = Arc::new(OutcomeGenerator::new(&players).unwrap());
        let lineup = Lineup::new(players);

        // HR, out, HR, out, HR, out
        let one = EvaluationTask::new(0, lineup.clone(), 2, 1, 17, generator.clone())
            .run()
            .unwrap();
        assert_eq!(one.score, 3.0);

        let two = EvaluationTask::new(1, lineup, 3, 2, 17, generator)
            .run()
            .unwrap();
        assert_eq!(two.score, 6.0);
    }
}
