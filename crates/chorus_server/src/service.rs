//! Async entry point for generation.

use crate::{GenerationMetrics, Orchestrator, WorkerPool};
use chorus_core::{GenerationRequest, GenerationResult};
use chorus_error::{ChorusResult, GenerationErrorKind};
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Schedules [`Orchestrator::generate`] on the worker pool.
///
/// Awaiting the pool is the only suspension point of a request.
#[derive(Debug, Clone)]
pub struct GenerationService {
    orchestrator: Arc<Orchestrator>,
    pool: WorkerPool,
    metrics: GenerationMetrics,
}

impl GenerationService {
    /// Create a service running `orchestrator` on `pool`.
    pub fn new(orchestrator: Orchestrator, pool: WorkerPool) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            pool,
            metrics: GenerationMetrics::default(),
        }
    }

    /// Replace the metrics handle.
    pub fn with_metrics(self, metrics: GenerationMetrics) -> Self {
        Self { metrics, ..self }
    }

    /// The wrapped orchestrator.
    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Generate continuations from every model without blocking the caller's
    /// executor thread.
    ///
    /// # Errors
    ///
    /// See [`Orchestrator::generate`] and [`WorkerPool::run`].
    #[instrument(skip_all)]
    pub async fn generate(&self, request: GenerationRequest) -> ChorusResult<GenerationResult> {
        let started = Instant::now();
        let orchestrator = Arc::clone(&self.orchestrator);
        let outcome = self
            .pool
            .run(move || orchestrator.generate(&request))
            .await;

        let label = match &outcome {
            Ok(_) => "success",
            Err(e) => match e.kind() {
                GenerationErrorKind::Validation(_) => "invalid",
                GenerationErrorKind::Internal(_) => "error",
                GenerationErrorKind::Overloaded(_) => "rejected",
                GenerationErrorKind::Timeout(_) => "timeout",
            },
        };
        self.metrics
            .record_request(label, started.elapsed().as_secs_f64());
        outcome
    }
}
