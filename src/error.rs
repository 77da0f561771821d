// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error type of a benchmark run.

use thiserror::Error;

/// Errors that abort a benchmark run.
///
/// Misuse of the adders (buffers of different lengths) is a programming error
/// and panics instead.
#[derive(Debug, Error)]
pub enum BenchError {
    /// Writing the report or querying the platform failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A worker thread of a fork-join group couldn't be spawned.
    #[error("failed to spawn worker thread #{id}: {source}")]
    Spawn {
        /// Index of the worker within its group.
        id: usize,
        /// Underlying error returned by the operating system.
        source: std::io::Error,
    },
    /// A worker thread couldn't be pinned to its CPU under
    /// [`CpuPinningPolicy::Always`](crate::CpuPinningPolicy::Always).
    #[error("failed to pin worker thread #{id} to CPU #{id}: {source}")]
    Pinning {
        /// Index of the worker within its group, which is also the CPU index.
        id: usize,
        /// Underlying error returned by the operating system.
        source: std::io::Error,
    },
    /// The configured range of random values is empty, or its sums don't fit
    /// in an `i32`.
    #[error("invalid value range {min}..={max}")]
    InvalidValueRange {
        /// Lower bound of the range.
        min: i32,
        /// Upper bound of the range.
        max: i32,
    },
    /// An addition pass produced a wrong element.
    #[error("wrong sum at index {index}: expected {expected}, got {actual}")]
    Mismatch {
        /// Index of the first wrong element.
        index: usize,
        /// Expected sum of the operands at this index.
        expected: i32,
        /// Value found in the output buffer.
        actual: i32,
    },
}
