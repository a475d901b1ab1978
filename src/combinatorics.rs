//! Ranking and unranking of permutations and combinations.
//!
//! Permutations are ordered by the factorial number system (Lehmer code), combinations by the
//! combinatorial number system (colexicographic order of sorted k-subsets). Ranks outside the
//! valid range are programming errors and panic.

/// Largest `n` whose factorial fits in a `u64`.
pub const MAX_FACTORIAL_INPUT: usize = 20;

const FACTORIALS: [u64; MAX_FACTORIAL_INPUT + 1] = {
    let mut table = [1u64; MAX_FACTORIAL_INPUT + 1];
    let mut i = 1;
    while i <= MAX_FACTORIAL_INPUT {
        table[i] = table[i - 1] * i as u64;
        i += 1;
    }
    table
};

pub fn checked_factorial(n: usize) -> Option<u64> {
    FACTORIALS.get(n).copied()
}

/// Panics if `n!` does not fit in a `u64`.
pub fn factorial(n: usize) -> u64 {
    checked_factorial(n)
        .unwrap_or_else(|| panic!("{}! overflows u64 (max input {})", n, MAX_FACTORIAL_INPUT))
}

/// `C(n, k)`, or `None` on overflow. `C(n, k) = 0` for `k > n`.
pub fn checked_binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is always divisible by (i + 1) at this point
        acc = acc * (n - i) as u128 / (i + 1) as u128;
        if acc > u64::MAX as u128 {
            return None;
        }
    }
    Some(acc as u64)
}

pub fn binomial(n: usize, k: usize) -> u64 {
    checked_binomial(n, k).unwrap_or_else(|| panic!("C({}, {}) overflows u64", n, k))
}

/// The `rank`-th permutation of `[0, n)` in lexicographic order.
pub fn ith_permutation(n: usize, rank: u64) -> Vec<usize> {
    let total = factorial(n);
    assert!(
        rank < total,
        "permutation rank {} out of range for n = {} (size {})",
        rank,
        n,
        total
    );

    let mut remaining: Vec<usize> = (0..n).collect();
    let mut result = Vec::with_capacity(n);
    let mut rank = rank;

    for pos in 0..n {
        let radix = FACTORIALS[n - 1 - pos];
        let pick = (rank / radix) as usize;
        rank %= radix;
        result.push(remaining.remove(pick));
    }
    result
}

/// Inverse of [`ith_permutation`].
pub fn rank_permutation(perm: &[usize]) -> u64 {
    let n = perm.len();
    let mut rank = 0u64;
    for (pos, &value) in perm.iter().enumerate() {
        let smaller_after = perm[pos + 1..].iter().filter(|&&v| v < value).count() as u64;
        rank += smaller_after * factorial(n - 1 - pos);
    }
    rank
}

/// The `rank`-th sorted `k`-subset of `[0, n)` in colexicographic order.
pub fn ith_combination(n: usize, k: usize, rank: u64) -> Vec<usize> {
    let total = binomial(n, k);
    assert!(
        rank < total,
        "combination rank {} out of range for C({}, {}) = {}",
        rank,
        n,
        k,
        total
    );

    let mut result = vec![0usize; k];
    let mut rank = rank;
    let mut upper = n;

    for i in (1..=k).rev() {
        // Largest c < upper with C(c, i) <= rank
        let mut c = upper - 1;
        while binomial(c, i) > rank {
            c -= 1;
        }
        result[i - 1] = c;
        rank -= binomial(c, i);
        upper = c;
    }
    result
}

/// Inverse of [`ith_combination`]. `combo` must be strictly increasing.
pub fn rank_combination(combo: &[usize]) -> u64 {
    combo
        .iter()
        .enumerate()
        .map(|(i, &c)| binomial(c, i + 1))
        .sum()
}

/// Reorders `items` by the index sequence `order`.
pub fn apply_order<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().map(|&i| items[i].clone()).collect()
}
