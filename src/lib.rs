// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![doc = include_str!("../README.md")]
#![forbid(missing_docs, unsafe_code)]

mod add;
mod bench;
mod config;
mod error;
mod fork_join;
mod init;
mod macros;
mod range;
mod report;
mod sweep;
mod timing;

pub use add::{add_parallel, add_sequential, verify_sum};
pub use bench::{run, BenchSummary, Buffers};
pub use config::{BenchConfig, MAX_SWEEP_THREADS, VALUE_RANGE, VECTOR_SIZE};
pub use error::BenchError;
pub use fork_join::{CpuPinningPolicy, ForkJoin, ForkJoinBuilder, ThreadCount};
pub use init::{fill_random, Seed};
pub use range::FixedRanges;
pub use report::Report;
pub use sweep::{run_sweep, thread_counts, SweepSample};
pub use timing::{time, Elapsed};
