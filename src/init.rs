// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Random initialization of the operand buffers.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use std::ops::RangeInclusive;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the seed of the random operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seed {
    /// Seed from the current wall-clock time, so that every run draws
    /// different operands.
    Time,
    /// Seed from the given value, for reproducible runs.
    Fixed(u64),
}

impl Seed {
    /// Returns the concrete seed value.
    pub fn value(self) -> u64 {
        match self {
            Seed::Time => {
                // Clocks set before the epoch fall back to a zero seed.
                let since_epoch = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default();
                since_epoch.as_nanos() as u64
            }
            Seed::Fixed(seed) => seed,
        }
    }

    /// Creates a random number generator from this seed.
    pub fn rng(self) -> ChaCha12Rng {
        ChaCha12Rng::seed_from_u64(self.value())
    }
}

/// Fills both buffers with values drawn uniformly from `values`.
///
/// Values are drawn alternately for `left[i]` and `right[i]`, so that the
/// same seed always yields the same pair of buffers.
///
/// # Panics
///
/// Panics if the buffers have different lengths or if `values` is empty.
pub fn fill_random(
    left: &mut [i32],
    right: &mut [i32],
    values: &RangeInclusive<i32>,
    rng: &mut impl Rng,
) {
    assert_eq!(
        left.len(),
        right.len(),
        "called fill_random() with buffers of different lengths"
    );
    for (l, r) in left.iter_mut().zip(right.iter_mut()) {
        *l = rng.random_range(values.clone());
        *r = rng.random_range(values.clone());
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_fill_random_within_range() {
        let mut left = vec![0; 100_000];
        let mut right = vec![0; 100_000];
        fill_random(&mut left, &mut right, &(1..=100), &mut Seed::Fixed(42).rng());
        assert!(left.iter().chain(&right).all(|x| (1..=100).contains(x)));
    }

    #[test]
    fn test_fill_random_hits_both_bounds() {
        let mut left = vec![0; 100_000];
        let mut right = vec![0; 100_000];
        fill_random(&mut left, &mut right, &(1..=100), &mut Seed::Fixed(7).rng());
        for bound in [1, 100] {
            assert!(left.contains(&bound));
            assert!(right.contains(&bound));
        }
    }

    #[test]
    fn test_fill_random_fixed_seed_is_reproducible() {
        let fill = |seed| {
            let mut left = vec![0; 1000];
            let mut right = vec![0; 1000];
            fill_random(&mut left, &mut right, &(1..=100), &mut Seed::Fixed(seed).rng());
            (left, right)
        };
        assert_eq!(fill(1), fill(1));
        assert_ne!(fill(1), fill(2));
    }

    #[test]
    fn test_fill_random_single_value_range() {
        let mut left = vec![0; 10];
        let mut right = vec![0; 10];
        fill_random(&mut left, &mut right, &(5..=5), &mut Seed::Time.rng());
        assert_eq!(left, [5; 10]);
        assert_eq!(right, [5; 10]);
    }

    #[test]
    #[should_panic = "called fill_random() with buffers of different lengths"]
    fn test_fill_random_different_lengths() {
        let mut left = vec![0; 10];
        let mut right = vec![0; 11];
        fill_random(&mut left, &mut right, &(1..=100), &mut Seed::Fixed(0).rng());
    }
}
