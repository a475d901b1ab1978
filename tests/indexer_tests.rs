use lineupforge::combinatorics::{
    binomial, factorial, ith_combination, ith_permutation, rank_combination, rank_permutation,
};
use lineupforge::lineup::{Lineup, LineupIndexer, LineupType};
use lineupforge::stats::{Player, PlayerGroup};
use proptest::prelude::*;
use rstest::rstest;
use std::collections::HashSet;
use std::sync::Arc;

fn roster(a_count: usize, b_count: usize) -> Vec<Arc<Player>> {
    let a = (0..a_count).map(|i| Player::new(&format!("a{}", i), PlayerGroup::A, [3, 1, 0, 0, 0]));
    let b = (0..b_count).map(|i| Player::new(&format!("b{}", i), PlayerGroup::B, [3, 1, 0, 0, 0]));
    a.chain(b).map(Arc::new).collect()
}

fn ids(lineup: &Lineup) -> Vec<String> {
    lineup.ids()
}

/// No two B players next to each other, including last-to-first.
fn is_valid_circular(lineup: &[Arc<Player>]) -> bool {
    let n = lineup.len();
    (0..n).all(|i| {
        let next = (i + 1) % n;
        n < 2 || !(lineup[i].group == PlayerGroup::B && lineup[next].group == PlayerGroup::B)
    })
}

fn all_orders(players: &[Arc<Player>]) -> Vec<Vec<Arc<Player>>> {
    if players.is_empty() {
        return vec![vec![]];
    }
    let mut out = Vec::new();
    for i in 0..players.len() {
        let mut rest = players.to_vec();
        let head = rest.remove(i);
        for mut tail in all_orders(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

fn enumerate(indexer: &LineupIndexer) -> Vec<Lineup> {
    (0..indexer.size())
        .map(|i| indexer.get_lineup(i).expect("index inside the space"))
        .collect()
}

#[test]
fn no_consecutive_matches_brute_force_for_four_and_two() {
    let players = roster(4, 2);
    let indexer = LineupIndexer::new(LineupType::NoConsecutiveFemales, players.clone()).unwrap();
    assert_eq!(indexer.size(), 432);

    let produced = enumerate(&indexer);
    for lineup in &produced {
        assert_eq!(lineup.len(), 6);
        assert!(
            is_valid_circular(lineup.players()),
            "invalid lineup {}",
            lineup
        );
    }

    let produced: HashSet<Vec<String>> = produced.iter().map(ids).collect();
    assert_eq!(produced.len(), 432, "duplicates in the index space");

    let expected: HashSet<Vec<String>> = all_orders(&players)
        .into_iter()
        .filter(|order| is_valid_circular(order))
        .map(|order| order.iter().map(|p| p.id.clone()).collect())
        .collect();
    assert_eq!(produced, expected);
}

#[rstest]
#[case(1, 0, 1)]
#[case(1, 1, 2)]
#[case(2, 2, 8)]
#[case(3, 1, 24)]
#[case(3, 2, 60)]
#[case(3, 3, 72)]
#[case(5, 2, 3360)]
fn no_consecutive_sizes_agree_with_brute_force(
    #[case] a_count: usize,
    #[case] b_count: usize,
    #[case] expected: u64,
) {
    let players = roster(a_count, b_count);
    let indexer = LineupIndexer::new(LineupType::NoConsecutiveFemales, players.clone()).unwrap();
    let brute = all_orders(&players)
        .into_iter()
        .filter(|order| is_valid_circular(order))
        .count() as u64;
    assert_eq!(brute, expected);
    assert_eq!(indexer.size(), expected);

    let distinct: HashSet<Vec<String>> = enumerate(&indexer).iter().map(ids).collect();
    assert_eq!(distinct.len() as u64, brute);
}

#[test]
fn no_minority_players_matches_ordinary_size() {
    let players = roster(3, 0);
    let constrained = LineupIndexer::new(LineupType::NoConsecutiveFemales, players.clone()).unwrap();
    let ordinary = LineupIndexer::new(LineupType::Ordinary, players).unwrap();
    assert_eq!(constrained.size(), 6);
    assert_eq!(constrained.size(), ordinary.size());

    let a: HashSet<Vec<String>> = enumerate(&constrained).iter().map(ids).collect();
    let b: HashSet<Vec<String>> = enumerate(&ordinary).iter().map(ids).collect();
    assert_eq!(a, b);
}

#[test]
fn ordinary_covers_every_permutation() {
    let indexer = LineupIndexer::new(LineupType::Ordinary, roster(5, 0)).unwrap();
    assert_eq!(indexer.size(), 120);
    let distinct: HashSet<Vec<String>> = enumerate(&indexer).iter().map(ids).collect();
    assert_eq!(distinct.len(), 120);
}

#[rstest]
#[case(LineupType::Ordinary, 4, 0)]
#[case(LineupType::NoConsecutiveFemales, 4, 2)]
fn past_the_end_is_none(#[case] kind: LineupType, #[case] a: usize, #[case] b: usize) {
    let indexer = LineupIndexer::new(kind, roster(a, b)).unwrap();
    assert!(indexer.get_lineup(indexer.size() - 1).is_some());
    assert!(indexer.get_lineup(indexer.size()).is_none());
    assert!(indexer.get_lineup(u64::MAX).is_none());
}

#[test]
fn initial_lineup_is_index_zero() {
    for kind in [LineupType::Ordinary, LineupType::NoConsecutiveFemales] {
        let indexer = LineupIndexer::new(kind, roster(4, 2)).unwrap();
        assert_eq!(Some(indexer.initial_lineup()), indexer.get_lineup(0));
    }
}

#[test]
fn too_many_minority_players_is_rejected() {
    assert!(LineupIndexer::new(LineupType::NoConsecutiveFemales, roster(2, 3)).is_err());
}

#[test]
fn factorial_overflow_is_rejected() {
    assert!(LineupIndexer::new(LineupType::Ordinary, roster(21, 0)).is_err());
}

proptest! {
    #[test]
    fn permutation_rank_round_trips(n in 1usize..10, seed in any::<u64>()) {
        let rank = seed % factorial(n);
        let perm = ith_permutation(n, rank);
        prop_assert_eq!(rank_permutation(&perm), rank);
    }

    #[test]
    fn combination_rank_round_trips(n in 1usize..16, k_seed in any::<usize>(), r_seed in any::<u64>()) {
        let k = k_seed % (n + 1);
        let rank = r_seed % binomial(n, k);
        let comb = ith_combination(n, k, rank);
        prop_assert_eq!(comb.len(), k);
        prop_assert!(comb.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(comb.iter().all(|&c| c < n));
        prop_assert_eq!(rank_combination(&comb), rank);
    }

    #[test]
    fn every_decoded_lineup_is_valid(a in 1usize..7, b_seed in any::<usize>(), idx_seed in any::<u64>()) {
        let b = b_seed % (a + 1);
        let indexer = LineupIndexer::new(LineupType::NoConsecutiveFemales, roster(a, b)).unwrap();
        let lineup = indexer.get_lineup(idx_seed % indexer.size()).unwrap();
        prop_assert_eq!(lineup.len(), a + b);
        prop_assert!(is_valid_circular(lineup.players()));
    }
}
