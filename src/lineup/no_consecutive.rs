use super::{checked_product, Lineup};
use crate::combinatorics::{
    apply_order, checked_binomial, factorial, ith_combination, ith_permutation,
    MAX_FACTORIAL_INPUT,
};
use crate::error::{LfResult, LineupForgeError};
use crate::stats::{Player, PlayerGroup};
use std::sync::Arc;

/// Lineups in which no two group B players bat consecutively, counting the wrap from the last
/// batter back to the first.
///
/// An index decodes in mixed radix as `(A permutation, B permutation, slot placement)`.
/// Slot placements are split in two disjoint ranges:
///
/// * `slot_rank < cutoff`: the last batter is from group B. Slot 0 is then always group A, and
///   the remaining `F - 1` group B players are spread over the `M - 1` gaps after the first
///   group A player.
/// * `slot_rank >= cutoff`: the last batter is from group A, and all `F` group B players are
///   spread over the `M` gaps in front of each group A player.
#[derive(Debug, Clone)]
pub struct NoConsecutiveIndexer {
    group_a: Vec<Arc<Player>>,
    group_b: Vec<Arc<Player>>,
    a_permutations: u64,
    b_permutations: u64,
    slot_combinations: u64,
    cutoff: u64,
    size: u64,
}

impl NoConsecutiveIndexer {
    pub fn new(players: Vec<Arc<Player>>) -> LfResult<Self> {
        let (group_a, group_b): (Vec<_>, Vec<_>) = players
            .into_iter()
            .partition(|p| p.group == PlayerGroup::A);

        let a_count = group_a.len();
        let b_count = group_b.len();

        if a_count + b_count == 0 {
            return Err(LineupForgeError::Config(
                "There must be at least one player in the lineup, but there were none"
                    .to_string(),
            ));
        }
        if a_count < b_count {
            return Err(LineupForgeError::Config(format!(
                "The number of group A players must be greater than or equal to the number of group B players. A: {} B: {}",
                a_count, b_count
            )));
        }
        if a_count > MAX_FACTORIAL_INPUT {
            return Err(LineupForgeError::Config(format!(
                "{} group A players is too many to enumerate exhaustively (max {})",
                a_count, MAX_FACTORIAL_INPUT
            )));
        }

        let overflow = || {
            LineupForgeError::Config("The number of slot placements overflows a 64-bit index".into())
        };
        let cutoff = if b_count == 0 {
            0
        } else {
            checked_binomial(a_count - 1, b_count - 1).ok_or_else(overflow)?
        };
        let slot_combinations = checked_binomial(a_count, b_count)
            .and_then(|c| c.checked_add(cutoff))
            .ok_or_else(overflow)?;

        let a_permutations = factorial(a_count);
        let b_permutations = factorial(b_count);
        let size = checked_product(&[a_permutations, b_permutations, slot_combinations], "lineups")?;

        Ok(Self {
            group_a,
            group_b,
            a_permutations,
            b_permutations,
            slot_combinations,
            cutoff,
            size,
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn slot_combinations(&self) -> u64 {
        self.slot_combinations
    }

    pub fn players(&self) -> Vec<Arc<Player>> {
        self.group_a.iter().chain(self.group_b.iter()).cloned().collect()
    }

    pub fn get_lineup(&self, index: u64) -> Option<Lineup> {
        if index >= self.size {
            return None;
        }

        let a_count = self.group_a.len();
        let b_count = self.group_b.len();
        let total = a_count + b_count;

        let a_rank = index % self.a_permutations;
        let b_rank = (index / self.a_permutations) % self.b_permutations;
        let slot_rank = index / (self.a_permutations * self.b_permutations);

        let a_order = apply_order(&self.group_a, &ith_permutation(a_count, a_rank));
        let b_order = apply_order(&self.group_b, &ith_permutation(b_count, b_rank));

        let b_slots: Vec<usize> = if slot_rank < self.cutoff {
            let mut slots: Vec<usize> = ith_combination(a_count - 1, b_count - 1, slot_rank)
                .into_iter()
                .enumerate()
                .map(|(i, gap)| gap + i + 1)
                .collect();
            slots.push(total - 1);
            slots
        } else {
            ith_combination(a_count, b_count, slot_rank - self.cutoff)
                .into_iter()
                .enumerate()
                .map(|(i, gap)| gap + i)
                .collect()
        };

        let mut merged = Vec::with_capacity(total);
        let mut next_slot = b_slots.iter().peekable();
        let mut a_iter = a_order.into_iter();
        let mut b_iter = b_order.into_iter();

        for slot in 0..total {
            let player = if next_slot.peek() == Some(&&slot) {
                next_slot.next();
                b_iter.next()
            } else {
                a_iter.next()
            };
            // Slot counts always match the group sizes
            merged.extend(player);
        }

        Some(Lineup::new(merged))
    }

    pub fn initial_lineup(&self) -> Lineup {
        self.get_lineup(0)
            .unwrap_or_else(|| Lineup::new(self.players()))
    }
}
