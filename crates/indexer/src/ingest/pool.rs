//! Bounded worker pool for CPU-bound member work.
//!
//! Jobs run on the blocking thread pool; a semaphore caps how many run at
//! once. Results come back in submission order regardless of completion order.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::warn;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("worker panicked: {0}")]
    Panicked(String),

    #[error("worker was cancelled")]
    Cancelled,
}

impl From<JoinError> for JobError {
    fn from(e: JoinError) -> Self {
        if e.is_panic() {
            JobError::Panicked(e.to_string())
        } else {
            JobError::Cancelled
        }
    }
}

#[derive(Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    width: usize,
}

impl WorkerPool {
    pub fn new(width: usize) -> Self {
        let width = width.max(1);
        Self {
            permits: Arc::new(Semaphore::new(width)),
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Run every job and return one outcome per job, in submission order.
    pub async fn run_ordered<T, F>(&self, jobs: Vec<F>) -> Vec<Result<T, JobError>>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let total = jobs.len();
        let mut set = JoinSet::new();

        for (idx, job) in jobs.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            set.spawn(async move {
                // The semaphore is never closed, so acquisition only fails at shutdown.
                let _permit = permits.acquire_owned().await.ok();
                let outcome = tokio::task::spawn_blocking(job)
                    .await
                    .map_err(JobError::from);
                (idx, outcome)
            });
        }

        let mut slots: Vec<Option<Result<T, JobError>>> = (0..total).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, outcome)) => slots[idx] = Some(outcome),
                Err(e) => warn!(error = %e, "Worker supervisor task failed"),
            }
        }

        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Err(JobError::Cancelled)))
            .collect()
    }
}
