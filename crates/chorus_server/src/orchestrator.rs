//! Fans one request out to every registered model.

use crate::GenerationMetrics;
use chorus_core::{
    GenerationDefaults, GenerationParameters, GenerationRequest, GenerationResult, sanitize,
};
use chorus_error::{
    ChorusResult, GenerationError, GenerationErrorKind, InvocationError, InvocationErrorKind,
};
use chorus_models::{ModelRegistry, TextGenerator};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Message returned to callers for a blank prompt.
pub const EMPTY_PROMPT_DETAIL: &str = "Prompt cannot be empty or just whitespace.";

/// Turns one [`GenerationRequest`] into one [`GenerationResult`].
///
/// Holds no per-request state. Models are invoked one after another in
/// registry order, and a failing model only affects its own entry.
///
/// Every call blocks for the combined inference time of all models; async
/// callers go through [`crate::GenerationService`].
#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<ModelRegistry>,
    defaults: GenerationDefaults,
    metrics: GenerationMetrics,
}

impl Orchestrator {
    /// Create an orchestrator over `registry`.
    pub fn new(registry: Arc<ModelRegistry>, defaults: GenerationDefaults) -> Self {
        Self {
            registry,
            defaults,
            metrics: GenerationMetrics::default(),
        }
    }

    /// Replace the metrics handle.
    pub fn with_metrics(self, metrics: GenerationMetrics) -> Self {
        Self { metrics, ..self }
    }

    /// The registry this orchestrator reads.
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Generate continuations of `request.prompt` from every registered model.
    ///
    /// # Errors
    ///
    /// Returns a `Validation` error when the prompt is blank; no model is
    /// invoked in that case. Per-model failures are not errors: they appear as
    /// a single `"Error generating text: ..."` entry for that model.
    #[instrument(skip_all, fields(models = self.registry.len()))]
    pub fn generate(&self, request: &GenerationRequest) -> ChorusResult<GenerationResult> {
        let prompt = request.trimmed_prompt().ok_or_else(|| {
            GenerationError::new(GenerationErrorKind::Validation(
                EMPTY_PROMPT_DETAIL.to_string(),
            ))
        })?;
        let params = request.resolve(&self.defaults);
        debug!(?params, "Resolved generation parameters");

        let mut result = GenerationResult::new();
        for model in self.registry.entries() {
            let texts = match invoke(model.generator().as_ref(), prompt, &params) {
                Ok(texts) => {
                    debug!(model = %model.id(), count = texts.len(), "Model succeeded");
                    texts
                }
                Err(e) => {
                    warn!(model = %model.id(), error = %e, "Model invocation failed");
                    self.metrics.record_model_failure(model.id());
                    vec![format!("Error generating text: {}", e.kind())]
                }
            };
            result.insert(model.id().clone(), texts);
        }

        info!(models = result.len(), "Generation complete");
        Ok(result)
    }
}

/// Run one model and sanitize its candidates. Panics count as failures.
fn invoke(
    generator: &dyn TextGenerator,
    prompt: &str,
    params: &GenerationParameters,
) -> Result<Vec<String>, InvocationError> {
    let raw = catch_unwind(AssertUnwindSafe(|| generator.generate(prompt, params)))
        .map_err(|payload| InvocationErrorKind::Panicked(panic_message(payload.as_ref())))??;
    Ok(raw.iter().map(|text| sanitize(text, prompt)).collect())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
