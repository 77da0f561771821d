// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Element-wise addition of two slices, sequential and parallel.

use crate::error::BenchError;
use crate::fork_join::ForkJoin;

/// Checks that the three slices share one length.
fn assert_same_lengths(left: &[i32], right: &[i32], output: &[i32], caller: &str) {
    assert!(
        left.len() == right.len() && left.len() == output.len(),
        "called {caller}() with slices of different lengths: {} + {} -> {}",
        left.len(),
        right.len(),
        output.len()
    );
}

/// Sets `output[i] = left[i] + right[i]` for every index, in increasing order,
/// on the current thread.
///
/// ```
/// # use vecadd::add_sequential;
/// let mut output = [0; 5];
/// add_sequential(&[1, 2, 3, 4, 5], &[10, 20, 30, 40, 50], &mut output);
/// assert_eq!(output, [11, 22, 33, 44, 55]);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn add_sequential(left: &[i32], right: &[i32], output: &mut [i32]) {
    assert_same_lengths(left, right, output, "add_sequential");
    left.iter()
        .zip(right)
        .zip(output.iter_mut())
        .for_each(|((&a, &b), out)| *out = a + b);
}

/// Sets `output[i] = left[i] + right[i]` for every index, with the index range
/// split into one contiguous chunk per thread of `fork_join`.
///
/// The result is identical to [`add_sequential()`] for any number of threads.
///
/// ```
/// # use std::num::NonZeroUsize;
/// # use vecadd::{add_parallel, CpuPinningPolicy, ForkJoin};
/// let fork_join = ForkJoin::new(NonZeroUsize::try_from(3).unwrap(), CpuPinningPolicy::No);
/// let mut output = [0; 5];
/// add_parallel(&[1, 2, 3, 4, 5], &[10, 20, 30, 40, 50], &mut output, &fork_join).unwrap();
/// assert_eq!(output, [11, 22, 33, 44, 55]);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths.
pub fn add_parallel(
    left: &[i32],
    right: &[i32],
    output: &mut [i32],
    fork_join: &ForkJoin,
) -> Result<(), BenchError> {
    assert_same_lengths(left, right, output, "add_parallel");
    fork_join.for_each_chunk(output, |range, chunk| {
        left[range.clone()]
            .iter()
            .zip(&right[range])
            .zip(chunk.iter_mut())
            .for_each(|((&a, &b), out)| *out = a + b);
    })
}

/// Checks that `output[i] == left[i] + right[i]` for every index, and reports
/// the first index where it doesn't hold.
pub fn verify_sum(left: &[i32], right: &[i32], output: &[i32]) -> Result<(), BenchError> {
    assert_same_lengths(left, right, output, "verify_sum");
    let mismatch = left
        .iter()
        .zip(right)
        .zip(output)
        .enumerate()
        .find(|&(_, ((&a, &b), &out))| a.checked_add(b) != Some(out));
    match mismatch {
        None => Ok(()),
        Some((index, ((&a, &b), &actual))) => Err(BenchError::Mismatch {
            index,
            expected: a.wrapping_add(b),
            actual,
        }),
    }
}
