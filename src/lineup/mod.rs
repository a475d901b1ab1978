pub mod no_consecutive;
pub mod ordinary;

pub use self::no_consecutive::NoConsecutiveIndexer;
pub use self::ordinary::OrdinaryIndexer;

use crate::error::{LfResult, LineupForgeError};
use crate::stats::Player;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Structural constraint family governing which batting orders are valid.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(ascii_case_insensitive)]
pub enum LineupType {
    /// Any permutation of the selected players.
    #[strum(serialize = "ORDINARY", serialize = "1")]
    Ordinary,
    /// Group B players never bat back to back, including last-to-first.
    #[strum(serialize = "NO_CONSECUTIVE_FEMALES", serialize = "3")]
    NoConsecutiveFemales,
}

impl LineupType {
    pub fn id(&self) -> u8 {
        match self {
            LineupType::Ordinary => 1,
            LineupType::NoConsecutiveFemales => 3,
        }
    }
}

/// A concrete batting order. Players are shared, never copied per candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct Lineup {
    players: Vec<Arc<Player>>,
}

impl Lineup {
    pub fn new(players: Vec<Arc<Player>>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[Arc<Player>] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.id.clone()).collect()
    }
}

impl fmt::Display for Lineup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.players.iter().map(|p| p.display_name()).collect();
        write!(f, "{}", names.join(", "))
    }
}

/// Bijection from `[0, size())` onto every valid lineup of a topology.
#[derive(Debug, Clone)]
pub enum LineupIndexer {
    Ordinary(OrdinaryIndexer),
    NoConsecutive(NoConsecutiveIndexer),
}

impl LineupIndexer {
    pub fn new(lineup_type: LineupType, players: Vec<Arc<Player>>) -> LfResult<Self> {
        let indexer = match lineup_type {
            LineupType::Ordinary => LineupIndexer::Ordinary(OrdinaryIndexer::new(players)?),
            LineupType::NoConsecutiveFemales => {
                LineupIndexer::NoConsecutive(NoConsecutiveIndexer::new(players)?)
            }
        };

        if indexer.size() == 0 {
            return Err(LineupForgeError::EmptySearchSpace(format!(
                "There are no possible lineups for lineup type {} and this player combination",
                lineup_type
            )));
        }
        Ok(indexer)
    }

    pub fn lineup_type(&self) -> LineupType {
        match self {
            LineupIndexer::Ordinary(_) => LineupType::Ordinary,
            LineupIndexer::NoConsecutive(_) => LineupType::NoConsecutiveFemales,
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            LineupIndexer::Ordinary(i) => i.size(),
            LineupIndexer::NoConsecutive(i) => i.size(),
        }
    }

    /// `None` when `index >= size()`.
    pub fn get_lineup(&self, index: u64) -> Option<Lineup> {
        match self {
            LineupIndexer::Ordinary(i) => i.get_lineup(index),
            LineupIndexer::NoConsecutive(i) => i.get_lineup(index),
        }
    }

    pub fn initial_lineup(&self) -> Lineup {
        match self {
            LineupIndexer::Ordinary(i) => i.initial_lineup(),
            LineupIndexer::NoConsecutive(i) => i.initial_lineup(),
        }
    }

    /// Every player that appears in the lineups of this index space.
    pub fn players(&self) -> Vec<Arc<Player>> {
        match self {
            LineupIndexer::Ordinary(i) => i.players().to_vec(),
            LineupIndexer::NoConsecutive(i) => i.players(),
        }
    }
}

pub(crate) fn checked_product(factors: &[u64], what: &str) -> LfResult<u64> {
    factors.iter().try_fold(1u64, |acc, &f| {
        acc.checked_mul(f).ok_or_else(|| {
            LineupForgeError::Config(format!("The number of {} overflows a 64-bit index", what))
        })
    })
}
