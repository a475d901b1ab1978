use super::Lineup;
use crate::combinatorics::{apply_order, factorial, ith_permutation, MAX_FACTORIAL_INPUT};
use crate::error::{LfResult, LineupForgeError};
use crate::stats::Player;
use std::sync::Arc;

/// Every permutation of the selected players, indexed by permutation rank.
#[derive(Debug, Clone)]
pub struct OrdinaryIndexer {
    players: Vec<Arc<Player>>,
    size: u64,
}

impl OrdinaryIndexer {
    pub fn new(players: Vec<Arc<Player>>) -> LfResult<Self> {
        if players.is_empty() {
            return Err(LineupForgeError::Config(
                "There must be at least one player in the lineup, but there were none"
                    .to_string(),
            ));
        }
        if players.len() > MAX_FACTORIAL_INPUT {
            return Err(LineupForgeError::Config(format!(
                "{} players is too many to enumerate exhaustively (max {})",
                players.len(),
                MAX_FACTORIAL_INPUT
            )));
        }

        let size = factorial(players.len());
        Ok(Self { players, size })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    pub fn get_lineup(&self, index: u64) -> Option<Lineup> {
        if index >= self.size {
            return None;
        }
        let order = ith_permutation(self.players.len(), index);
        Some(Lineup::new(apply_order(&self.players, &order)))
    }

    pub fn initial_lineup(&self) -> Lineup {
        Lineup::new(self.players.clone())
    }
}
