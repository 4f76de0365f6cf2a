//! Test utilities for chorus_models tests.

use chorus_core::GenerationParameters;
use chorus_error::{InvocationError, RegistryError, RegistryErrorKind};
use chorus_models::{ModelLoader, TextGenerator};
use std::sync::{Arc, Mutex};

/// Generator that echoes the prompt followed by a fixed suffix.
pub struct EchoGenerator {
    id: String,
    seed: u64,
}

impl EchoGenerator {
    pub fn new(id: &str, seed: u64) -> Self {
        Self {
            id: id.to_string(),
            seed,
        }
    }
}

impl TextGenerator for EchoGenerator {
    fn model_id(&self) -> &str {
        &self.id
    }

    fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParameters,
    ) -> Result<Vec<String>, InvocationError> {
        Ok(vec![format!("{prompt} from {} seeded {}", self.id, self.seed)])
    }
}

/// Loader that records requested models and fails on a chosen identifier.
#[derive(Default)]
pub struct RecordingLoader {
    pub loaded: Mutex<Vec<(String, u64)>>,
    pub fail_on: Option<String>,
}

impl RecordingLoader {
    pub fn failing_on(model: &str) -> Self {
        Self {
            loaded: Mutex::new(Vec::new()),
            fail_on: Some(model.to_string()),
        }
    }
}

impl ModelLoader for RecordingLoader {
    fn load(&self, model_id: &str, seed: u64) -> Result<Arc<dyn TextGenerator>, RegistryError> {
        if self.fail_on.as_deref() == Some(model_id) {
            return Err(RegistryError::new(RegistryErrorKind::Load {
                model: model_id.to_string(),
                message: "weights not found".to_string(),
            }));
        }
        self.loaded
            .lock()
            .unwrap()
            .push((model_id.to_string(), seed));
        Ok(Arc::new(EchoGenerator::new(model_id, seed)))
    }
}
