// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::mem::size_of;

const NUM_THREADS: &[usize] = &[1, 2, 4, 8];
const LENGTHS: &[usize] = &[10_000, 100_000, 1_000_000, 10_000_000];

fn add(c: &mut Criterion) {
    let mut group = c.benchmark_group("add");
    for len in LENGTHS {
        group.throughput(Throughput::Bytes((len * 2 * size_of::<i32>()) as u64));
        group.bench_with_input(BenchmarkId::new("sequential", len), len, sequential::add);
        for &num_threads in NUM_THREADS {
            group.bench_with_input(
                BenchmarkId::new(format!("rayon@{num_threads}"), len),
                len,
                |bencher, len| rayon::add(bencher, num_threads, len),
            );
            group.bench_with_input(
                BenchmarkId::new(format!("fork_join@{num_threads}"), len),
                len,
                |bencher, len| fork_join::add(bencher, num_threads, len),
            );
        }
    }
    group.finish();
}

/// Generates the operands of a benchmark, with the reference value range.
fn operands(len: usize) -> (Vec<i32>, Vec<i32>) {
    let mut left = vec![0; len];
    let mut right = vec![0; len];
    vecadd::fill_random(
        &mut left,
        &mut right,
        &vecadd::VALUE_RANGE,
        &mut vecadd::Seed::Fixed(42).rng(),
    );
    (left, right)
}

/// Baseline benchmarks on the current thread.
mod sequential {
    use criterion::{black_box, Bencher};

    pub fn add(bencher: &mut Bencher, len: &usize) {
        let (left, right) = super::operands(*len);
        let mut output = vec![0; *len];

        let left_slice = left.as_slice();
        let right_slice = right.as_slice();
        let output_slice = output.as_mut_slice();

        bencher.iter(|| {
            vecadd::add_sequential(
                black_box(left_slice),
                black_box(right_slice),
                black_box(&mut *output_slice),
            )
        });
    }
}

/// Benchmarks using Rayon, for comparison.
mod rayon {
    use criterion::{black_box, Bencher};
    use rayon::iter::{
        IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator,
        ParallelIterator,
    };

    pub fn add(bencher: &mut Bencher, num_threads: usize, len: &usize) {
        let (left, right) = super::operands(*len);
        let mut output = vec![0; *len];

        let left_slice = left.as_slice();
        let right_slice = right.as_slice();
        let output_slice = output.as_mut_slice();

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .unwrap();
        thread_pool.install(|| {
            bencher.iter(|| {
                black_box(left_slice)
                    .par_iter()
                    .zip(black_box(right_slice))
                    .zip(black_box(output_slice.par_iter_mut()))
                    .for_each(|((&a, &b), out)| *out = a + b)
            })
        });
    }
}

/// Benchmarks of the fork-join adder.
mod fork_join {
    use criterion::{black_box, Bencher};
    use vecadd::{CpuPinningPolicy, ForkJoinBuilder, ThreadCount};

    pub fn add(bencher: &mut Bencher, num_threads: usize, len: &usize) {
        let (left, right) = super::operands(*len);
        let mut output = vec![0; *len];

        let left_slice = left.as_slice();
        let right_slice = right.as_slice();
        let output_slice = output.as_mut_slice();

        let fork_join = ForkJoinBuilder {
            num_threads: ThreadCount::try_from(num_threads).unwrap(),
            cpu_pinning: CpuPinningPolicy::IfSupported,
        }
        .build()
        .unwrap();

        bencher.iter(|| {
            vecadd::add_parallel(
                black_box(left_slice),
                black_box(right_slice),
                black_box(&mut *output_slice),
                &fork_join,
            )
            .unwrap()
        });
    }
}

criterion_group!(benches, add);
criterion_main!(benches);
