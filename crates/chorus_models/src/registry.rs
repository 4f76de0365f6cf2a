//! Process-wide registry of loaded models.

use crate::{ModelLoader, TextGenerator};
use chorus_error::{RegistryError, RegistryErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, instrument};

/// Which models to load and how to seed them.
///
/// Loaded from the `[registry]` section of the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RegistryConfig {
    /// Sampling seed applied to every model for reproducible output
    #[serde(default = "default_seed")]
    seed: u64,
    /// Model identifiers, in the order results are reported
    #[serde(default = "default_models")]
    models: Vec<String>,
}

impl RegistryConfig {
    /// Create a config for `models` with the default seed.
    pub fn new(models: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            seed: default_seed(),
            models: models.into_iter().map(Into::into).collect(),
        }
    }

    /// Replace the sampling seed.
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            models: default_models(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_models() -> Vec<String> {
    vec!["gpt2".to_string(), "distilgpt2".to_string()]
}

/// A registry entry: one identifier and its loaded generator.
#[derive(Clone, Getters)]
pub struct RegisteredModel {
    /// Unique model identifier
    id: String,
    /// Loaded inference capability
    generator: Arc<dyn TextGenerator>,
}

impl std::fmt::Debug for RegisteredModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredModel")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Owns every loaded model from startup until shutdown.
///
/// Populated once by [`ModelRegistry::load`] and emptied by
/// [`ModelRegistry::unload`]. Request handling only reads it.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: RwLock<Vec<RegisteredModel>>,
}

impl ModelRegistry {
    /// Eagerly load every configured model.
    ///
    /// Blocks until all models are ready. Any single failure aborts the whole
    /// load; the process is not expected to start without its full model set.
    ///
    /// # Errors
    ///
    /// Returns an error if a model fails to load or an identifier repeats.
    #[instrument(skip(loader), fields(seed = config.seed, count = config.models.len()))]
    pub fn load(config: &RegistryConfig, loader: &dyn ModelLoader) -> Result<Self, RegistryError> {
        let mut models: Vec<RegisteredModel> = Vec::with_capacity(config.models.len());
        for id in &config.models {
            if models.iter().any(|m| m.id == *id) {
                return Err(RegistryError::new(RegistryErrorKind::DuplicateModel(
                    id.clone(),
                )));
            }
            debug!(model = %id, "Loading model");
            let generator = loader.load(id, config.seed)?;
            info!(model = %id, "Model loaded");
            models.push(RegisteredModel {
                id: id.clone(),
                generator,
            });
        }

        info!(count = models.len(), "Model registry ready");
        Ok(Self {
            models: RwLock::new(models),
        })
    }

    /// Build a registry from generators that are already loaded.
    ///
    /// Registration order follows the iterator; identifiers come from
    /// [`TextGenerator::model_id`].
    ///
    /// # Errors
    ///
    /// Returns an error if two generators report the same identifier.
    pub fn from_generators(
        generators: impl IntoIterator<Item = Arc<dyn TextGenerator>>,
    ) -> Result<Self, RegistryError> {
        let mut models: Vec<RegisteredModel> = Vec::new();
        for generator in generators {
            let id = generator.model_id().to_string();
            if models.iter().any(|m| m.id == id) {
                return Err(RegistryError::new(RegistryErrorKind::DuplicateModel(id)));
            }
            models.push(RegisteredModel { id, generator });
        }
        Ok(Self {
            models: RwLock::new(models),
        })
    }

    /// Release every loaded model. Calling it again is a no-op.
    #[instrument(skip(self))]
    pub fn unload(&self) {
        let released = {
            let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *models)
        };
        info!(count = released.len(), "Model registry unloaded");
        drop(released);
    }

    /// Snapshot of the registered models in registration order.
    pub fn entries(&self) -> Vec<RegisteredModel> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Registered identifiers in registration order.
    pub fn identifiers(&self) -> Vec<String> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|m| m.id.clone())
            .collect()
    }

    /// Look up one model by identifier.
    pub fn get(&self, id: &str) -> Option<Arc<dyn TextGenerator>> {
        self.models
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| m.id == id)
            .map(|m| Arc::clone(&m.generator))
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
