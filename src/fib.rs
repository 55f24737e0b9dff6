// Naive recursive fibonacci, used as a profiling target.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{LabError, Result};
use crate::timing::{self, Timing};

pub const DEFAULT_TIMED_N: u32 = 35;
pub const DEFAULT_REPEAT_N: u32 = 30;
pub const DEFAULT_RUNS: u32 = 100;

pub fn fibonacci(n: u32) -> u64 {
    if n < 2 { n as u64 } else { fibonacci(n - 1) + fibonacci(n - 2) }
}

/// Same recursion, also returning how many calls it took.
pub fn fibonacci_counted(n: u32) -> (u64, u64) {
    fn go(n: u32, calls: &mut u64) -> u64 {
        *calls += 1;
        if n < 2 { n as u64 } else { go(n - 1, calls) + go(n - 2, calls) }
    }
    let mut calls = 0;
    let value = go(n, &mut calls);
    (value, calls)
}

pub fn verify_fib() -> Result<()> {
    const CASES: [(u32, u64); 4] = [(0, 0), (1, 1), (2, 1), (10, 55)];
    for (n, expected) in CASES {
        let actual = fibonacci(n);
        if actual != expected {
            return Err(LabError::FibMismatch { n, expected, actual });
        }
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct SingleTiming {
    pub n: u32,
    pub value: u64,
    #[serde(flatten)]
    pub timing: Timing,
}

pub fn time_once(n: u32) -> SingleTiming {
    let (value, timing) = timing::measure(|| fibonacci(n));
    info!(n, wall_secs = timing.wall.as_secs_f64(), "timed fibonacci");
    SingleTiming { n, value, timing }
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct RepeatTiming {
    pub n: u32,
    pub runs: u32,
    #[serde(rename = "total_secs", serialize_with = "crate::timing::secs")]
    pub total: Duration,
    #[serde(rename = "average_secs", serialize_with = "crate::timing::secs")]
    pub average: Duration,
}

/// Total and mean wall time over `runs` calls of `fibonacci(n)`.
pub fn time_repeated(n: u32, runs: u32) -> Result<RepeatTiming> {
    if runs == 0 {
        return Err(LabError::InvalidArgument("runs must be positive".into()));
    }
    let start = Instant::now();
    for _ in 0..runs {
        std::hint::black_box(fibonacci(std::hint::black_box(n)));
    }
    let total = start.elapsed();
    debug!(n, runs, total_secs = total.as_secs_f64(), "repeated fibonacci");
    Ok(RepeatTiming { n, runs, total, average: total / runs })
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct CallProfile {
    pub n: u32,
    pub value: u64,
    pub calls: u64,
    #[serde(flatten)]
    pub timing: Timing,
}

pub fn profile_calls(n: u32) -> CallProfile {
    let ((value, calls), timing) = timing::measure(|| fibonacci_counted(n));
    CallProfile { n, value, calls, timing }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(fibonacci(0), 0);
        assert_eq!(fibonacci(1), 1);
        assert_eq!(fibonacci(2), 1);
        assert_eq!(fibonacci(10), 55);
        assert_eq!(fibonacci(20), 6765);
    }

    #[test]
    fn verification_passes() {
        verify_fib().expect("fib table");
    }

    #[test]
    fn call_count_is_two_fib_plus_one_minus_one() {
        for n in 0..20 {
            let (value, calls) = fibonacci_counted(n);
            assert_eq!(value, fibonacci(n));
            assert_eq!(calls, 2 * fibonacci(n + 1) - 1, "n = {n}");
        }
    }

    #[test]
    fn repeated_timing_averages() {
        let t = time_repeated(15, 10).expect("timing");
        assert_eq!(t.runs, 10);
        assert_eq!(t.average, t.total / 10);
    }

    #[test]
    fn zero_runs_rejected() {
        assert!(matches!(time_repeated(5, 0), Err(LabError::InvalidArgument(_))));
    }

    #[test]
    fn single_timing_carries_value() {
        assert_eq!(time_once(12).value, 144);
        assert_eq!(profile_calls(5).calls, 15);
    }
}
