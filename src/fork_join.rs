// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Fork-join execution over contiguous chunks of an output buffer.

use crate::error::BenchError;
use crate::macros::{log_debug, log_error, log_warn};
#[cfg(feature = "log_parallelism")]
use crate::macros::log_trace;
use crate::range::FixedRanges;
// Platforms that support `libc::sched_setaffinity()`.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
use nix::{
    sched::{sched_setaffinity, CpuSet},
    unistd::Pid,
};
use std::num::NonZeroUsize;
use std::ops::Range;
use std::thread::ScopedJoinHandle;

/// Number of worker threads to fork.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThreadCount {
    /// Fork the number of threads returned by
    /// [`std::thread::available_parallelism()`].
    AvailableParallelism,
    /// Fork the given number of threads.
    Count(NonZeroUsize),
}

impl ThreadCount {
    /// Resolves this count into a concrete number of threads.
    pub fn resolve(self) -> std::io::Result<NonZeroUsize> {
        match self {
            ThreadCount::AvailableParallelism => std::thread::available_parallelism(),
            ThreadCount::Count(count) => Ok(count),
        }
    }
}

impl TryFrom<usize> for ThreadCount {
    type Error = <NonZeroUsize as TryFrom<usize>>::Error;

    fn try_from(thread_count: usize) -> Result<Self, Self::Error> {
        let count = NonZeroUsize::try_from(thread_count)?;
        Ok(ThreadCount::Count(count))
    }
}

/// Policy to pin worker threads to CPUs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CpuPinningPolicy {
    /// Don't pin worker threads to CPUs.
    #[default]
    No,
    /// Pin each worker thread to a CPU, if CPU pinning is supported and
    /// implemented on this platform.
    IfSupported,
    /// Pin each worker thread to a CPU. If a worker can't be pinned, the call
    /// fails with [`BenchError::Pinning`]. If CPU pinning isn't supported on
    /// this platform (or not implemented), forking workers will panic.
    Always,
}

/// A builder for [`ForkJoin`].
#[derive(Clone, Copy, Debug)]
pub struct ForkJoinBuilder {
    /// Number of worker threads to fork on each call.
    pub num_threads: ThreadCount,
    /// Policy to pin worker threads to CPUs.
    pub cpu_pinning: CpuPinningPolicy,
}

impl ForkJoinBuilder {
    /// Resolves the thread count and returns the corresponding [`ForkJoin`].
    ///
    /// ```
    /// # use vecadd::{CpuPinningPolicy, ForkJoinBuilder, ThreadCount};
    /// let fork_join = ForkJoinBuilder {
    ///     num_threads: ThreadCount::try_from(4).unwrap(),
    ///     cpu_pinning: CpuPinningPolicy::No,
    /// }
    /// .build()
    /// .unwrap();
    ///
    /// let mut output = [0; 10];
    /// fork_join
    ///     .for_each_chunk(&mut output, |range, chunk| {
    ///         for (i, out) in range.zip(chunk) {
    ///             *out = i * i;
    ///         }
    ///     })
    ///     .unwrap();
    /// assert_eq!(output, [0, 1, 4, 9, 16, 25, 36, 49, 64, 81]);
    /// ```
    pub fn build(&self) -> std::io::Result<ForkJoin> {
        Ok(ForkJoin {
            num_threads: self.num_threads.resolve()?,
            cpu_pinning: self.cpu_pinning,
        })
    }
}

/// Executes work on a fixed number of threads, forked for the duration of a
/// single call and joined before it returns.
///
/// No thread outlives a call, so a [`ForkJoin`] is only a description of how
/// to fork and can be freely copied.
#[derive(Clone, Copy, Debug)]
pub struct ForkJoin {
    num_threads: NonZeroUsize,
    cpu_pinning: CpuPinningPolicy,
}

impl ForkJoin {
    /// Returns a fork-join description with the given number of threads.
    pub fn new(num_threads: NonZeroUsize, cpu_pinning: CpuPinningPolicy) -> Self {
        Self {
            num_threads,
            cpu_pinning,
        }
    }

    /// Returns the number of worker threads forked on each call.
    pub fn num_threads(&self) -> NonZeroUsize {
        self.num_threads
    }

    /// Splits `output` into [`num_threads()`](Self::num_threads) contiguous
    /// chunks and calls `work` once per chunk, each on its own worker thread.
    ///
    /// The first argument of `work` is the range of indices that the chunk
    /// covers in `output`. Returns once all the workers have been joined. If a
    /// worker panics, the panic is propagated to the caller after the other
    /// workers have been joined. A worker that fails to spawn or to be pinned
    /// under [`CpuPinningPolicy::Always`] makes the call return the first such
    /// error, in worker order.
    pub fn for_each_chunk<T: Send>(
        &self,
        output: &mut [T],
        work: impl Fn(Range<usize>, &mut [T]) + Sync,
    ) -> Result<(), BenchError> {
        #[cfg(any(
            miri,
            not(any(
                target_os = "android",
                target_os = "dragonfly",
                target_os = "freebsd",
                target_os = "linux"
            ))
        ))]
        match self.cpu_pinning {
            CpuPinningPolicy::No => (),
            CpuPinningPolicy::IfSupported => {
                log_warn!("Pinning threads to CPUs is not implemented on this platform.")
            }
            CpuPinningPolicy::Always => {
                panic!("Pinning threads to CPUs is not implemented on this platform.")
            }
        }

        let num_elements = output.len();
        let work = &work;
        let cpu_pinning = self.cpu_pinning;

        std::thread::scope(|scope| {
            let mut handles: Vec<ScopedJoinHandle<'_, Result<(), BenchError>>> =
                Vec::with_capacity(self.num_threads.get());
            let mut spawn_error = None;
            let mut rest = output;

            for (id, range) in FixedRanges::new(self.num_threads, num_elements).enumerate() {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;

                let spawned = std::thread::Builder::new()
                    .name(format!("vecadd-worker-{id}"))
                    .spawn_scoped(scope, move || {
                        pin_current_thread(id, cpu_pinning)?;
                        run_worker(id, range, chunk, work);
                        Ok(())
                    });
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        log_error!("[main thread] Failed to spawn thread #{id}: {source}");
                        spawn_error = Some(BenchError::Spawn { id, source });
                        break;
                    }
                }
            }
            log_debug!("[main thread] Spawned {} threads", handles.len());

            let mut panic_payload = None;
            let mut worker_error = None;
            for (_id, handle) in handles.into_iter().enumerate() {
                match handle.join() {
                    Ok(Ok(())) => (),
                    Ok(Err(e)) => {
                        log_error!("[main thread] Thread #{_id} failed: {e}");
                        worker_error.get_or_insert(e);
                    }
                    Err(payload) => {
                        log_error!("[main thread] Thread #{_id} panicked");
                        panic_payload.get_or_insert(payload);
                    }
                }
            }
            log_debug!("[main thread] Joined threads");

            if let Some(payload) = panic_payload {
                std::panic::resume_unwind(payload);
            }
            match worker_error.or(spawn_error) {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })
    }
}

/// Body of a worker thread.
#[cfg(not(feature = "log_parallelism"))]
fn run_worker<T>(
    _id: usize,
    range: Range<usize>,
    chunk: &mut [T],
    work: &impl Fn(Range<usize>, &mut [T]),
) {
    work(range, chunk);
}

/// Body of a worker thread, also tracing how long each worker took.
#[cfg(feature = "log_parallelism")]
fn run_worker<T>(
    id: usize,
    range: Range<usize>,
    chunk: &mut [T],
    work: &impl Fn(Range<usize>, &mut [T]),
) {
    let start = std::time::Instant::now();
    log_trace!("[thread {id}] Processing range {range:?}");
    work(range, chunk);
    log_trace!("[thread {id}] Done in {:?}", start.elapsed());
}

/// Pins the current thread to the CPU of the same index, according to the
/// given policy. Only [`CpuPinningPolicy::Always`] turns a failure into an
/// error.
#[cfg(all(
    not(miri),
    any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    )
))]
fn pin_current_thread(id: usize, cpu_pinning: CpuPinningPolicy) -> Result<(), BenchError> {
    match cpu_pinning {
        CpuPinningPolicy::No => (),
        CpuPinningPolicy::IfSupported => {
            let mut cpu_set = CpuSet::new();
            if let Err(_e) = cpu_set.set(id) {
                log_warn!("Failed to set CPU affinity for thread #{id}: {_e}");
            } else if let Err(_e) = sched_setaffinity(Pid::from_raw(0), &cpu_set) {
                log_warn!("Failed to set CPU affinity for thread #{id}: {_e}");
            } else {
                log_debug!("Pinned thread #{id} to CPU #{id}");
            }
        }
        CpuPinningPolicy::Always => {
            let mut cpu_set = CpuSet::new();
            cpu_set
                .set(id)
                .and_then(|()| sched_setaffinity(Pid::from_raw(0), &cpu_set))
                .map_err(|errno| BenchError::Pinning {
                    id,
                    source: errno.into(),
                })?;
            log_debug!("Pinned thread #{id} to CPU #{id}");
        }
    }
    Ok(())
}

/// CPU pinning isn't implemented on this platform, which
/// [`ForkJoin::for_each_chunk()`] already reported.
#[cfg(any(
    miri,
    not(any(
        target_os = "android",
        target_os = "dragonfly",
        target_os = "freebsd",
        target_os = "linux"
    ))
))]
fn pin_current_thread(_id: usize, _cpu_pinning: CpuPinningPolicy) -> Result<(), BenchError> {
    Ok(())
}
