use super::{Outcome, OutcomeDistribution};

const OUTS_PER_INNING: u32 = 3;

/// Runners on first, second and third.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Bases([bool; 3]);

impl Bases {
    /// Moves every runner and the batter forward `bases`, returning the runs scored.
    fn advance(&mut self, bases: usize) -> u32 {
        if bases == 0 {
            return 0;
        }

        let mut runs = 0;
        let mut next = [false; 3];
        for (base, &occupied) in self.0.iter().enumerate() {
            if !occupied {
                continue;
            }
            let target = base + bases;
            if target >= 3 {
                runs += 1;
            } else {
                next[target] = true;
            }
        }

        // Batter starts at home (position -1 relative to first base)
        if bases >= 4 {
            runs += 1;
        } else {
            next[bases - 1] = true;
        }

        self.0 = next;
        runs
    }
}

/// Plays one game of `innings` innings and returns the total runs scored.
///
/// `order` holds the outcome distributions in batting order. The batting order carries over
/// between innings and wraps from the last batter back to the first.
pub fn simulate_game(
    order: &[&OutcomeDistribution],
    innings: usize,
    rng: &mut fastrand::Rng,
) -> u32 {
    let mut runs = 0;
    let mut batters = order.iter().cycle();

    for _ in 0..innings {
        let mut outs = 0;
        let mut bases = Bases::default();

        while outs < OUTS_PER_INNING {
            let Some(batter) = batters.next() else {
                return runs;
            };
            match batter.sample(rng) {
                Outcome::Out => outs += 1,
                hit => runs += bases.advance(hit.bases()),
            }
        }
    }
    runs
}
