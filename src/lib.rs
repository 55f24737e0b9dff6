pub mod math;
pub mod error;
pub mod timing;
pub mod config;
pub mod logging;
pub mod julia;
pub mod primes;
pub mod fib;
pub mod squares;
pub mod paths;
pub mod report;

pub use math::C;
pub use error::{LabError, Result};
pub use config::LabConfig;
pub use julia::{
    JULIA_C, EXPECTED_SUM, Region, JuliaGrid, JuliaReport,
    escape_time, calc_complex_numbers, calc_z_serial, run_julia_set, verify_checksum
};
pub use primes::{is_prime, find_primes, run_find_primes, PrimeReport};
pub use fib::{fibonacci, fibonacci_counted, verify_fib, time_once, time_repeated, profile_calls};
pub use squares::{slow_square, run_squares, WorkerPool, SquaresReport};
pub use paths::{Grid, unique_paths_recursive, unique_paths_dp, sample_grids, run_sample_grids};
