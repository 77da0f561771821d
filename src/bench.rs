// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! End-to-end benchmark run.

use crate::add::{add_parallel, add_sequential, verify_sum};
use crate::config::BenchConfig;
use crate::error::BenchError;
use crate::fork_join::{ForkJoinBuilder, ThreadCount};
use crate::init::fill_random;
use crate::macros::{log_debug, log_error, log_info, log_warn};
use crate::report::Report;
use crate::sweep::{run_sweep, SweepSample};
use crate::timing::{time, Elapsed};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::io::Write;
use std::num::NonZeroUsize;

/// The two operand buffers and the result buffer, allocated once and reused by
/// every addition pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Buffers {
    /// Left operand.
    pub left: Vec<i32>,
    /// Right operand.
    pub right: Vec<i32>,
    /// Result of the last addition pass.
    pub output: Vec<i32>,
}

impl Buffers {
    /// Allocates zeroed buffers of the given length.
    pub fn zeroed(len: usize) -> Self {
        Self {
            left: vec![0; len],
            right: vec![0; len],
            output: vec![0; len],
        }
    }

    /// Checks the result buffer, if `verify` is set.
    fn check(&self, verify: bool) -> Result<(), BenchError> {
        if !verify {
            return Ok(());
        }
        verify_sum(&self.left, &self.right, &self.output).inspect_err(|_e| {
            log_error!("Verification failed: {_e}");
        })
    }
}

/// Timings collected by a benchmark run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BenchSummary {
    /// Time of the sequential pass.
    pub sequential: Elapsed,
    /// Time of the parallel pass with the configured number of threads.
    pub parallel: Elapsed,
    /// Number of threads of the parallel pass.
    pub parallel_threads: NonZeroUsize,
    /// Maximum number of threads that the platform can run in parallel.
    pub max_threads: NonZeroUsize,
    /// Steps of the thread-count sweep, in order.
    pub sweep: Vec<SweepSample>,
}

/// Runs the whole benchmark described by `config` and writes the report to
/// `out`.
///
/// The buffers are allocated and filled first, then the sequential pass, the
/// parallel pass and the sweep are timed one after the other. Allocation and
/// initialization are never part of a measured time.
pub fn run(config: &BenchConfig, out: impl Write) -> Result<BenchSummary, BenchError> {
    config.validate()?;
    log_info!("Running benchmark with {config:?}");

    let max_threads = ThreadCount::AvailableParallelism
        .resolve()
        .unwrap_or_else(|_e| {
            log_warn!("Failed to query the available parallelism: {_e}");
            NonZeroUsize::MIN
        });
    let fork_join = ForkJoinBuilder {
        num_threads: config.num_threads,
        cpu_pinning: config.cpu_pinning,
    }
    .build()?;
    let parallel_threads = fork_join.num_threads();

    let mut buffers = Buffers::zeroed(config.vector_size);
    let seed = config.seed.value();
    log_info!("Filling {} elements with seed {seed}", config.vector_size);
    fill_random(
        &mut buffers.left,
        &mut buffers.right,
        &config.value_range,
        &mut ChaCha12Rng::seed_from_u64(seed),
    );

    let ((), sequential) =
        time(|| add_sequential(&buffers.left, &buffers.right, &mut buffers.output));
    log_debug!("Sequential pass took {sequential:?}");
    buffers.check(config.verify)?;

    let (result, parallel) = time(|| {
        add_parallel(
            &buffers.left,
            &buffers.right,
            &mut buffers.output,
            &fork_join,
        )
    });
    result?;
    log_debug!("Parallel pass with {parallel_threads} threads took {parallel:?}");
    buffers.check(config.verify)?;

    let mut report = Report::new(out);
    report.vector_size(config.vector_size)?;
    report.sequential(sequential)?;
    report.parallel(parallel, parallel_threads)?;
    report.sweep_header(max_threads)?;

    let sweep = run_sweep(
        &mut buffers,
        config.sweep_bound,
        config.cpu_pinning,
        config.verify,
        |sample| Ok(report.sweep_sample(sample)?),
    )?;
    log_info!("Benchmark finished after {} sweep steps", sweep.len());

    Ok(BenchSummary {
        sequential,
        parallel,
        parallel_threads,
        max_threads,
        sweep,
    })
}
