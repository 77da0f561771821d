// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parameters of a benchmark run.

use crate::error::BenchError;
use crate::fork_join::{CpuPinningPolicy, ThreadCount};
use crate::init::Seed;
use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

/// Number of elements in each buffer of the reference run.
pub const VECTOR_SIZE: usize = 10_000_000;

/// Range of the random operands of the reference run.
pub const VALUE_RANGE: RangeInclusive<i32> = 1..=100;

/// Largest thread count tried by the sweep of the reference run.
pub const MAX_SWEEP_THREADS: NonZeroUsize = match NonZeroUsize::new(128) {
    Some(n) => n,
    None => unreachable!(),
};

/// Parameters of a benchmark run.
///
/// The [`Default`] value describes the reference run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchConfig {
    /// Number of elements in each of the three buffers.
    pub vector_size: usize,
    /// Inclusive range of the random operands.
    pub value_range: RangeInclusive<i32>,
    /// Number of threads of the full-parallelism pass.
    pub num_threads: ThreadCount,
    /// Largest thread count tried by the sweep.
    pub sweep_bound: NonZeroUsize,
    /// Seed of the random operands.
    pub seed: Seed,
    /// Policy to pin worker threads to CPUs.
    pub cpu_pinning: CpuPinningPolicy,
    /// Whether to check the output buffer after every addition pass.
    pub verify: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            vector_size: VECTOR_SIZE,
            value_range: VALUE_RANGE,
            num_threads: ThreadCount::AvailableParallelism,
            sweep_bound: MAX_SWEEP_THREADS,
            seed: Seed::Time,
            cpu_pinning: CpuPinningPolicy::No,
            verify: false,
        }
    }
}

impl BenchConfig {
    /// Checks that the value range is non-empty and that adding any two values
    /// of it can't overflow an `i32`.
    pub fn validate(&self) -> Result<(), BenchError> {
        let (min, max) = (*self.value_range.start(), *self.value_range.end());
        let invalid = min > max || min.checked_add(min).is_none() || max.checked_add(max).is_none();
        if invalid {
            return Err(BenchError::InvalidValueRange { min, max });
        }
        Ok(())
    }
}
