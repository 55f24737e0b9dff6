use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LabError>;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("invalid config: {0}")]
    Config(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid grid: {0}")]
    InvalidGrid(String),

    #[error("output sum {actual} does not match expected value {expected}")]
    ChecksumMismatch { expected: u64, actual: u64 },

    #[error("fibonacci({n}) returned {actual}, expected {expected}")]
    FibMismatch { n: u32, expected: u64, actual: u64 },

    #[error("failed to encode report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("worker task failed: {0}")]
    Worker(String),
}
