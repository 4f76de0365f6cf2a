//! Generation parameters shared by every model in a request.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Fallback values for request fields the caller leaves unset.
///
/// Loaded from the `[generation]` section of the service configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerationDefaults {
    /// Maximum length in tokens of prompt plus continuation
    #[serde(default = "default_max_length")]
    max_length: u32,
    /// Number of candidate continuations per model
    #[serde(default = "default_num_return_sequences")]
    num_return_sequences: u32,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    temperature: f32,
    /// Nucleus sampling threshold
    #[serde(default = "default_top_p")]
    top_p: f32,
    /// Top-k sampling cutoff
    #[serde(default = "default_top_k")]
    top_k: u32,
}

impl Default for GenerationDefaults {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
            num_return_sequences: default_num_return_sequences(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            top_k: default_top_k(),
        }
    }
}

fn default_max_length() -> u32 {
    100
}

fn default_num_return_sequences() -> u32 {
    1
}

fn default_temperature() -> f32 {
    1.0
}

fn default_top_p() -> f32 {
    0.9
}

fn default_top_k() -> u32 {
    50
}

/// Fully resolved parameters handed to each inference capability.
///
/// Built once per request; every model in that request sees the same values.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationParameters {
    /// Maximum length in tokens of prompt plus continuation
    pub(crate) max_length: u32,
    /// Number of candidate continuations to request
    pub(crate) num_return_sequences: u32,
    /// Sampling temperature
    pub(crate) temperature: f32,
    /// Nucleus sampling threshold
    pub(crate) top_p: f32,
    /// Top-k sampling cutoff
    pub(crate) top_k: u32,
    /// Truncate over-long prompts instead of failing
    #[builder(default = "true")]
    pub(crate) truncation: bool,
}

impl GenerationParameters {
    /// Creates a new builder for `GenerationParameters`.
    pub fn builder() -> GenerationParametersBuilder {
        GenerationParametersBuilder::default()
    }
}

impl From<&GenerationDefaults> for GenerationParameters {
    fn from(defaults: &GenerationDefaults) -> Self {
        Self {
            max_length: defaults.max_length,
            num_return_sequences: defaults.num_return_sequences,
            temperature: defaults.temperature,
            top_p: defaults.top_p,
            top_k: defaults.top_k,
            truncation: true,
        }
    }
}
