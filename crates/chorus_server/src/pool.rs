//! Bounded pool for blocking generation work.

use chorus_error::{ChorusResult, GenerationError, GenerationErrorKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Runs blocking jobs on tokio's blocking threads with admission control.
///
/// At most `max_concurrent` jobs run at once and at most `queue_depth` more
/// wait for a slot. Anything beyond that is rejected straight away with
/// `Overloaded`. A job that exceeds the deadline fails the caller with
/// `Timeout` but keeps its slot until the blocking work actually returns.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    workers: Arc<Semaphore>,
    admission: Arc<Semaphore>,
    timeout: Duration,
}

impl WorkerPool {
    /// Create a pool. `max_concurrent` is raised to 1 if given as 0, and both
    /// limits are capped at [`Semaphore::MAX_PERMITS`].
    pub fn new(max_concurrent: usize, queue_depth: usize, timeout: Duration) -> Self {
        let max_concurrent = max_concurrent.clamp(1, Semaphore::MAX_PERMITS);
        let admitted = max_concurrent
            .saturating_add(queue_depth)
            .min(Semaphore::MAX_PERMITS);
        Self {
            workers: Arc::new(Semaphore::new(max_concurrent)),
            admission: Arc::new(Semaphore::new(admitted)),
            timeout,
        }
    }

    /// Free worker slots right now.
    pub fn available_workers(&self) -> usize {
        self.workers.available_permits()
    }

    /// Run `job` on a blocking thread and wait for its result.
    ///
    /// # Errors
    ///
    /// `Overloaded` if the pool and queue are full, `Timeout` if the deadline
    /// passes first, `Internal` if the job panics, or whatever `job` returns.
    pub async fn run<F, T>(&self, job: F) -> ChorusResult<T>
    where
        F: FnOnce() -> ChorusResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let admitted = Arc::clone(&self.admission)
            .try_acquire_owned()
            .map_err(|_| {
                warn!("Worker pool saturated, rejecting request");
                GenerationError::new(GenerationErrorKind::Overloaded(
                    "too many generation requests in flight".to_string(),
                ))
            })?;

        let workers = Arc::clone(&self.workers);
        let work = async move {
            let worker = workers.acquire_owned().await.map_err(|e| {
                GenerationError::new(GenerationErrorKind::Internal(e.to_string()))
            })?;
            debug!("Worker slot acquired");

            // Both permits live until the blocking job returns, even if the
            // caller has stopped waiting.
            tokio::task::spawn_blocking(move || {
                let _slots = (admitted, worker);
                job()
            })
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Internal(e.to_string())))?
        };

        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| {
                warn!(timeout_secs = self.timeout.as_secs(), "Generation request timed out");
                GenerationError::new(GenerationErrorKind::Timeout(self.timeout.as_secs()))
            })?
    }
}
