//! TOML configuration for the exercises.
//!
//! Every field defaults to the canonical run, so an empty file (or no file)
//! reproduces the reference outputs.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LabError, Result};
use crate::{fib, julia, squares};

pub const DEFAULT_CONFIG_FILE: &str = "perf-lab.toml";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    pub julia: JuliaConfig,
    pub primes: PrimesConfig,
    pub fib: FibConfig,
    pub squares: SquaresConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JuliaConfig {
    pub width: usize,
    pub max_iter: u32,
    /// Check the output sum when running the canonical parameters.
    pub verify: bool,
}

impl JuliaConfig {
    /// The checksum is only known for the canonical width and budget.
    pub fn should_verify(&self) -> bool {
        self.verify
            && self.width == julia::CANONICAL_WIDTH
            && self.max_iter == julia::CANONICAL_MAX_ITER
    }
}

impl Default for JuliaConfig {
    fn default() -> Self {
        Self {
            width: julia::CANONICAL_WIDTH,
            max_iter: julia::CANONICAL_MAX_ITER,
            verify: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrimesConfig {
    pub size: u64,
}

impl Default for PrimesConfig {
    fn default() -> Self {
        Self { size: 100_000 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FibConfig {
    pub n: u32,
    pub repeat_n: u32,
    pub runs: u32,
}

impl Default for FibConfig {
    fn default() -> Self {
        Self {
            n: fib::DEFAULT_TIMED_N,
            repeat_n: fib::DEFAULT_REPEAT_N,
            runs: fib::DEFAULT_RUNS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SquaresConfig {
    pub count: u64,
    pub delay_ms: u64,
    /// None sizes the pool to the host's parallelism.
    pub workers: Option<usize>,
}

impl Default for SquaresConfig {
    fn default() -> Self {
        Self {
            count: squares::DEFAULT_COUNT,
            delay_ms: squares::DEFAULT_DELAY.as_millis() as u64,
            workers: None,
        }
    }
}

impl SquaresConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn pool(&self) -> Result<squares::WorkerPool> {
        match self.workers {
            Some(n) => squares::WorkerPool::new(n),
            None => Ok(squares::WorkerPool::default()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

impl LabConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| LabError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: LabConfig = toml::from_str(&raw).map_err(|source| LabError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults when `path` does not exist, otherwise `load`.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Command-line values win over the file. `None` keeps the file value.
    pub fn apply_julia(&mut self, width: Option<usize>, max_iter: Option<u32>, no_verify: bool) -> Result<()> {
        if let Some(w) = width { self.julia.width = w; }
        if let Some(m) = max_iter { self.julia.max_iter = m; }
        if no_verify { self.julia.verify = false; }
        self.validate()
    }

    pub fn apply_primes(&mut self, size: Option<u64>) -> Result<()> {
        if let Some(s) = size { self.primes.size = s; }
        self.validate()
    }

    pub fn apply_fib(&mut self, n: Option<u32>, repeat_n: Option<u32>, runs: Option<u32>) -> Result<()> {
        if let Some(v) = n { self.fib.n = v; }
        if let Some(v) = repeat_n { self.fib.repeat_n = v; }
        if let Some(v) = runs { self.fib.runs = v; }
        self.validate()
    }

    pub fn apply_squares(&mut self, count: Option<u64>, delay_ms: Option<u64>, workers: Option<usize>) -> Result<()> {
        if let Some(v) = count { self.squares.count = v; }
        if let Some(v) = delay_ms { self.squares.delay_ms = v; }
        if workers.is_some() { self.squares.workers = workers; }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = julia::check_width(self.julia.width) {
            return Err(LabError::Config(format!("julia.width: {e}")));
        }
        if self.julia.max_iter == 0 {
            return Err(LabError::Config("julia.max_iter must be positive".into()));
        }
        if self.fib.runs == 0 {
            return Err(LabError::Config("fib.runs must be positive".into()));
        }
        if self.squares.workers == Some(0) {
            return Err(LabError::Config("squares.workers must be positive".into()));
        }
        Ok(())
    }
}
