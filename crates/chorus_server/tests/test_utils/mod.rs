//! Test utilities for chorus_server tests.
//!
//! Stub and spy [`TextGenerator`]s that stand in for real models.

#![allow(dead_code)]

use chorus_core::{GenerationDefaults, GenerationParameters};
use chorus_error::{InvocationError, InvocationErrorKind};
use chorus_models::{ModelRegistry, TextGenerator};
use chorus_server::Orchestrator;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a [`StubGenerator`] responds.
#[derive(Clone)]
pub enum StubBehavior {
    /// Return the prompt followed by each continuation
    Continue(Vec<String>),
    /// Return these raw strings verbatim
    Raw(Vec<String>),
    /// Fail with an API error carrying this message
    Fail(String),
    /// Panic with this message
    Panic(String),
    /// Sleep, then echo the prompt followed by " done"
    Slow(Duration),
}

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub model: String,
    pub prompt: String,
    pub params: GenerationParameters,
}

/// Shared call log across several generators.
#[derive(Default, Clone)]
pub struct CallLog(Arc<Mutex<Vec<RecordedCall>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.0.lock().unwrap().clone()
    }

    pub fn models(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.model).collect()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

/// Configurable fake model that records every call.
pub struct StubGenerator {
    id: String,
    behavior: StubBehavior,
    log: CallLog,
    calls: AtomicUsize,
}

impl StubGenerator {
    pub fn new(id: &str, behavior: StubBehavior, log: &CallLog) -> Self {
        Self {
            id: id.to_string(),
            behavior,
            log: log.clone(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Generator that continues the prompt with one fixed string.
    pub fn continuing(id: &str, continuation: &str, log: &CallLog) -> Arc<dyn TextGenerator> {
        Arc::new(Self::new(
            id,
            StubBehavior::Continue(vec![continuation.to_string()]),
            log,
        ))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl TextGenerator for StubGenerator {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<String>, InvocationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.0.lock().unwrap().push(RecordedCall {
            model: self.id.clone(),
            prompt: prompt.to_string(),
            params: params.clone(),
        });

        match &self.behavior {
            StubBehavior::Continue(continuations) => Ok(continuations
                .iter()
                .map(|c| format!("{prompt}{c}"))
                .collect()),
            StubBehavior::Raw(raw) => Ok(raw.clone()),
            StubBehavior::Fail(message) => Err(InvocationError::new(InvocationErrorKind::Api {
                status: 500,
                message: message.clone(),
            })),
            StubBehavior::Panic(message) => panic!("{}", message),
            StubBehavior::Slow(delay) => {
                std::thread::sleep(*delay);
                Ok(vec![format!("{prompt} done")])
            }
        }
    }
}

/// Registry over the given generators, in order.
pub fn registry_of(generators: Vec<Arc<dyn TextGenerator>>) -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::from_generators(generators).expect("unique model ids"))
}

/// Orchestrator with default generation parameters.
pub fn orchestrator_of(generators: Vec<Arc<dyn TextGenerator>>) -> Orchestrator {
    Orchestrator::new(registry_of(generators), GenerationDefaults::default())
}
