// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! CLI tool to time the element-wise addition of two vectors, sequentially and
//! in parallel.

use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::process::ExitCode;
use vecadd::{BenchConfig, CpuPinningPolicy, Seed, ThreadCount, MAX_SWEEP_THREADS, VECTOR_SIZE};

fn main() -> ExitCode {
    #[cfg(feature = "log")]
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.into_config();

    let stdout = std::io::stdout().lock();
    match vecadd::run(&config, stdout) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            #[cfg(feature = "log")]
            log::error!("Benchmark failed: {e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// CLI tool to time the element-wise addition of two vectors, sequentially and
/// in parallel. Without arguments, runs the reference benchmark.
#[derive(Parser, Debug, PartialEq, Eq)]
#[command(version)]
struct Cli {
    /// Number of elements in each vector.
    #[arg(long, default_value_t = VECTOR_SIZE)]
    vector_size: usize,

    /// Smallest random operand.
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    min_value: i32,

    /// Largest random operand.
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    max_value: i32,

    /// Number of worker threads of the single parallel pass. Default to the
    /// available parallelism.
    #[arg(long)]
    num_threads: Option<NonZeroUsize>,

    /// Largest thread count of the sweep. The sweep tries every power of two up
    /// to this bound.
    #[arg(long, default_value_t = MAX_SWEEP_THREADS)]
    max_threads: NonZeroUsize,

    /// Seed of the random operands. Default to the current time.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy to pin worker threads to CPUs.
    #[arg(long, value_enum, default_value_t = CpuPinningCli::No)]
    cpu_pinning: CpuPinningCli,

    /// Check the result of every addition pass.
    #[arg(long, default_value_t = false)]
    verify: bool,
}

impl Cli {
    fn into_config(self) -> BenchConfig {
        BenchConfig {
            vector_size: self.vector_size,
            value_range: self.min_value..=self.max_value,
            num_threads: match self.num_threads {
                Some(num_threads) => ThreadCount::Count(num_threads),
                None => ThreadCount::AvailableParallelism,
            },
            sweep_bound: self.max_threads,
            seed: match self.seed {
                Some(seed) => Seed::Fixed(seed),
                None => Seed::Time,
            },
            cpu_pinning: match self.cpu_pinning {
                CpuPinningCli::No => CpuPinningPolicy::No,
                CpuPinningCli::IfSupported => CpuPinningPolicy::IfSupported,
                CpuPinningCli::Always => CpuPinningPolicy::Always,
            },
            verify: self.verify,
        }
    }
}

/// Policy to pin worker threads to CPUs.
#[derive(ValueEnum, Clone, Debug, PartialEq, Eq)]
enum CpuPinningCli {
    /// Don't pin worker threads.
    No,
    /// Pin each worker thread to a CPU, if the platform supports it.
    IfSupported,
    /// Pin each worker thread to a CPU, and fail otherwise.
    Always,
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_is_reference_run() {
        let config = Cli::try_parse_from(["vecadd"]).unwrap().into_config();
        assert_eq!(config, BenchConfig::default());
    }

    #[test]
    fn test_all_arguments() {
        let config = Cli::try_parse_from([
            "vecadd",
            "--vector-size",
            "1000",
            "--min-value",
            "-5",
            "--max-value",
            "5",
            "--num-threads",
            "3",
            "--max-threads",
            "10",
            "--seed",
            "42",
            "--cpu-pinning",
            "if-supported",
            "--verify",
        ])
        .unwrap()
        .into_config();

        assert_eq!(
            config,
            BenchConfig {
                vector_size: 1000,
                value_range: -5..=5,
                num_threads: ThreadCount::try_from(3).unwrap(),
                sweep_bound: NonZeroUsize::try_from(10).unwrap(),
                seed: Seed::Fixed(42),
                cpu_pinning: CpuPinningPolicy::IfSupported,
                verify: true,
            }
        );
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Cli::try_parse_from(["vecadd", "--max-threads", "0"]).is_err());
        assert!(Cli::try_parse_from(["vecadd", "--num-threads", "0"]).is_err());
    }
}
