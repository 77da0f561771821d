// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Wall-clock measurement of a single call.

use std::fmt;
use std::time::{Duration, Instant};

/// Wall-clock time taken by one measured call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Elapsed(Duration);

impl Elapsed {
    /// Returns the elapsed time in seconds. This is always a non-negative and
    /// finite number.
    pub fn seconds(&self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl From<Duration> for Elapsed {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

/// Formats as seconds with 6 decimal places, without unit.
impl fmt::Display for Elapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.seconds())
    }
}

/// Calls `f` and measures how long it took, on a monotonic clock.
pub fn time<T>(f: impl FnOnce() -> T) -> (T, Elapsed) {
    let start = Instant::now();
    let output = f();
    let elapsed = start.elapsed();
    (output, Elapsed(elapsed))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_time_returns_output() {
        let (output, elapsed) = time(|| 6 * 7);
        assert_eq!(output, 42);
        assert!(elapsed.seconds() >= 0.0);
        assert!(elapsed.seconds().is_finite());
    }

    #[test]
    fn test_time_measures_sleep() {
        let ((), elapsed) = time(|| std::thread::sleep(Duration::from_millis(20)));
        assert!(elapsed.seconds() >= 0.02);
    }

    #[test]
    fn test_elapsed_display() {
        assert_eq!(Elapsed::from(Duration::from_micros(1_234_567)).to_string(), "1.234567");
        assert_eq!(Elapsed::from(Duration::ZERO).to_string(), "0.000000");
        assert_eq!(Elapsed::from(Duration::from_nanos(400)).to_string(), "0.000000");
    }
}
