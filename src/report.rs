// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human-readable report of a benchmark run.

use crate::sweep::SweepSample;
use crate::timing::Elapsed;
use std::io::{self, Write};
use std::num::NonZeroUsize;

/// Writes the lines of the report to the underlying writer, flushing after
/// each section so that progress is visible while the sweep runs.
pub struct Report<W: Write> {
    out: W,
}

impl<W: Write> Report<W> {
    /// Creates a report writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    /// Reports the number of elements in each buffer.
    pub fn vector_size(&mut self, vector_size: usize) -> io::Result<()> {
        writeln!(self.out, "\nVector Size: {vector_size}")?;
        self.out.flush()
    }

    /// Reports the time of the sequential pass.
    pub fn sequential(&mut self, elapsed: Elapsed) -> io::Result<()> {
        writeln!(self.out, "\nSequential Execution Time: {elapsed} seconds")?;
        self.out.flush()
    }

    /// Reports the time of the parallel pass with all available threads.
    pub fn parallel(&mut self, elapsed: Elapsed, num_threads: NonZeroUsize) -> io::Result<()> {
        writeln!(
            self.out,
            "Parallel Execution Time: {elapsed} seconds, Threads: {num_threads}"
        )?;
        self.out.flush()
    }

    /// Reports the header of the sweep, with the maximum number of threads
    /// that the platform can run in parallel.
    pub fn sweep_header(&mut self, max_threads: NonZeroUsize) -> io::Result<()> {
        writeln!(
            self.out,
            "\n\nThread Count vs. Time:\nMaximum available threads in the system is {max_threads}\n"
        )?;
        self.out.flush()
    }

    /// Reports one step of the sweep.
    pub fn sweep_sample(&mut self, sample: &SweepSample) -> io::Result<()> {
        writeln!(
            self.out,
            "Threads: {}, Execution Time: {} seconds",
            sample.num_threads, sample.elapsed
        )?;
        self.out.flush()
    }
}
