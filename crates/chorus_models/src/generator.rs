//! Trait interfaces for inference capabilities.

use chorus_core::GenerationParameters;
use chorus_error::{InvocationError, RegistryError};
use std::sync::Arc;

/// A loaded model that produces text continuations.
///
/// Implementations block the calling thread for the duration of inference and
/// must only be driven from a blocking context.
pub trait TextGenerator: Send + Sync {
    /// Identifier the model was loaded under (e.g. "gpt2").
    fn model_id(&self) -> &str;

    /// Produce `params.num_return_sequences()` candidates for `prompt`.
    ///
    /// Each candidate is the prompt followed by its continuation, in the order
    /// the backend returned them.
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<String>, InvocationError>;
}

/// Creates [`TextGenerator`]s for the registry at startup.
pub trait ModelLoader {
    /// Load `model_id`, seeding its sampler with `seed`.
    fn load(&self, model_id: &str, seed: u64) -> Result<Arc<dyn TextGenerator>, RegistryError>;
}
