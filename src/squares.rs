use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::error::{LabError, Result};

pub const DEFAULT_COUNT: u64 = 5;
pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

/// Deliberately slow: sleeps for `delay` before squaring.
pub fn slow_square(x: u64, delay: Duration) -> u64 {
    std::thread::sleep(delay);
    x * x
}

/// Maps a blocking function over inputs on a bounded number of workers.
#[derive(Clone, Copy, Debug)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(LabError::InvalidArgument("worker pool needs at least one worker".into()));
        }
        Ok(WorkerPool { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Results come back in input order, whatever order the tasks finish in.
    pub async fn map<T, R, F>(&self, inputs: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        let len = inputs.len();
        let f = Arc::new(f);
        let permits = Arc::new(Semaphore::new(self.workers));
        let mut tasks = JoinSet::new();

        for (idx, input) in inputs.into_iter().enumerate() {
            let permit = Arc::clone(&permits)
                .acquire_owned()
                .await
                .map_err(|e| LabError::Worker(e.to_string()))?;
            let f = Arc::clone(&f);
            tasks.spawn_blocking(move || {
                let _permit = permit;
                (idx, f(input))
            });
            debug!(idx, "submitted task");
        }

        let mut slots: Vec<Option<R>> = (0..len).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            let (idx, value) = joined.map_err(|e| LabError::Worker(e.to_string()))?;
            slots[idx] = Some(value);
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| slot.ok_or_else(|| LabError::Worker(format!("task {idx} produced no result"))))
            .collect()
    }
}

impl Default for WorkerPool {
    fn default() -> Self {
        let workers = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        WorkerPool { workers }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SquaresReport {
    pub workers: usize,
    pub results: Vec<u64>,
    #[serde(rename = "elapsed_secs", serialize_with = "crate::timing::secs")]
    pub elapsed: Duration,
}

pub async fn run_squares(count: u64, delay: Duration, pool: WorkerPool) -> Result<SquaresReport> {
    let start = Instant::now();
    let results = pool.map((0..count).collect(), move |x| slow_square(x, delay)).await?;
    let elapsed = start.elapsed();
    info!(workers = pool.workers(), elapsed_secs = elapsed.as_secs_f64(), "parallel execution finished");
    Ok(SquaresReport { workers: pool.workers(), results, elapsed })
}
