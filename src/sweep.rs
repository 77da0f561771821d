// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Timing of the parallel addition across doubling thread counts.

use crate::add::{add_parallel, verify_sum};
use crate::bench::Buffers;
use crate::error::BenchError;
use crate::fork_join::{CpuPinningPolicy, ForkJoin};
use crate::macros::log_debug;
use crate::timing::{time, Elapsed};
use std::num::NonZeroUsize;

/// Measurement of the parallel addition with a given number of threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SweepSample {
    /// Number of worker threads.
    pub num_threads: NonZeroUsize,
    /// Time taken by the addition.
    pub elapsed: Elapsed,
}

/// Returns the thread counts `1, 2, 4, 8, ...` up to and including the largest
/// power of two that doesn't exceed `bound`.
///
/// ```
/// # use std::num::NonZeroUsize;
/// # use vecadd::thread_counts;
/// let counts = thread_counts(NonZeroUsize::try_from(10).unwrap())
///     .map(NonZeroUsize::get)
///     .collect::<Vec<_>>();
/// assert_eq!(counts, [1, 2, 4, 8]);
/// ```
pub fn thread_counts(bound: NonZeroUsize) -> impl Iterator<Item = NonZeroUsize> {
    std::iter::successors(Some(NonZeroUsize::MIN), |n| {
        n.get().checked_mul(2).and_then(NonZeroUsize::new)
    })
    .take_while(move |&n| n <= bound)
}

/// Runs and times the parallel addition once per thread count of
/// [`thread_counts(bound)`](thread_counts), one after the other.
///
/// Each sample is handed to `on_sample` as soon as it is measured, and the
/// samples are also returned in order. With `verify`, the output buffer is
/// checked after each step, outside of the timed region.
pub fn run_sweep(
    buffers: &mut Buffers,
    bound: NonZeroUsize,
    cpu_pinning: CpuPinningPolicy,
    verify: bool,
    mut on_sample: impl FnMut(&SweepSample) -> Result<(), BenchError>,
) -> Result<Vec<SweepSample>, BenchError> {
    let mut samples = Vec::new();
    for num_threads in thread_counts(bound) {
        let fork_join = ForkJoin::new(num_threads, cpu_pinning);
        let (result, elapsed) = time(|| {
            add_parallel(
                &buffers.left,
                &buffers.right,
                &mut buffers.output,
                &fork_join,
            )
        });
        result?;
        log_debug!("Sweep step with {num_threads} threads took {elapsed:?}");
        if verify {
            verify_sum(&buffers.left, &buffers.right, &buffers.output)?;
        }

        let sample = SweepSample {
            num_threads,
            elapsed,
        };
        on_sample(&sample)?;
        samples.push(sample);
    }
    Ok(samples)
}

#[cfg(test)]
mod test {
    use super::*;

    fn counts(bound: usize) -> Vec<usize> {
        thread_counts(NonZeroUsize::try_from(bound).unwrap())
            .map(NonZeroUsize::get)
            .collect()
    }

    #[test]
    fn test_thread_counts() {
        assert_eq!(counts(1), [1]);
        assert_eq!(counts(2), [1, 2]);
        assert_eq!(counts(3), [1, 2]);
        assert_eq!(counts(10), [1, 2, 4, 8]);
        assert_eq!(counts(128), [1, 2, 4, 8, 16, 32, 64, 128]);
        assert_eq!(counts(255), [1, 2, 4, 8, 16, 32, 64, 128]);
    }

    #[test]
    fn test_thread_counts_no_overflow() {
        let counts = counts(usize::MAX);
        assert_eq!(counts.len(), usize::BITS as usize);
        assert_eq!(*counts.last().unwrap(), 1 << (usize::BITS - 1));
    }

    #[test]
    fn test_run_sweep_one_sample_per_step() {
        let mut buffers = Buffers {
            left: vec![1, 2, 3, 4, 5],
            right: vec![10, 20, 30, 40, 50],
            output: vec![0; 5],
        };
        let mut reported = Vec::new();
        let samples = run_sweep(
            &mut buffers,
            NonZeroUsize::try_from(10).unwrap(),
            CpuPinningPolicy::No,
            true,
            |sample| {
                reported.push(*sample);
                Ok(())
            },
        )
        .unwrap();

        assert_eq!(samples, reported);
        assert_eq!(
            samples
                .iter()
                .map(|s| s.num_threads.get())
                .collect::<Vec<_>>(),
            [1, 2, 4, 8]
        );
        assert!(samples
            .iter()
            .all(|s| s.elapsed.seconds() >= 0.0 && s.elapsed.seconds().is_finite()));
        assert_eq!(buffers.output, [11, 22, 33, 44, 55]);
    }

    #[test]
    fn test_run_sweep_stops_on_callback_error() {
        let mut buffers = Buffers {
            left: vec![1; 16],
            right: vec![2; 16],
            output: vec![0; 16],
        };
        let mut calls = 0;
        let result = run_sweep(
            &mut buffers,
            NonZeroUsize::try_from(8).unwrap(),
            CpuPinningPolicy::No,
            false,
            |_| {
                calls += 1;
                Err(BenchError::Io(std::io::ErrorKind::BrokenPipe.into()))
            },
        );
        assert!(matches!(result, Err(BenchError::Io(_))));
        assert_eq!(calls, 1);
    }
}
