use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

/// Trial division by every integer up to the square root of `n`.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    let mut i: u64 = 2;
    // i <= n / i is i * i <= n without overflow near u64::MAX
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 1;
    }
    true
}

/// All primes in `2..=size`, ascending.
pub fn find_primes(size: u64) -> Vec<u64> {
    (2..=size).filter(|&n| is_prime(n)).collect()
}

#[derive(Clone, Debug, Serialize)]
pub struct PrimeReport {
    pub size: u64,
    pub count: usize,
    pub largest: Option<u64>,
    #[serde(rename = "elapsed_secs", serialize_with = "crate::timing::secs")]
    pub elapsed: Duration,
}

pub fn run_find_primes(size: u64) -> PrimeReport {
    info!(size, "finding primes");
    let start = Instant::now();
    let primes = find_primes(size);
    let elapsed = start.elapsed();
    info!(count = primes.len(), elapsed_secs = elapsed.as_secs_f64(), "primes found");
    PrimeReport {
        size,
        count: primes.len(),
        largest: primes.last().copied(),
        elapsed,
    }
}
