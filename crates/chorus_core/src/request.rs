//! Incoming text generation request.

use crate::{GenerationDefaults, GenerationParameters};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Body of a `POST /generate-text/` call.
///
/// Every field except `prompt` is optional. An absent field, or one set to
/// zero, falls back to the service's [`GenerationDefaults`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// Text to continue
    prompt: String,
    /// Maximum length in tokens of prompt plus continuation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    max_length: Option<u32>,
    /// Number of continuations each model should return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    num_return_sequences: Option<u32>,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    temperature: Option<f32>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    top_p: Option<f32>,
    /// Top-k sampling cutoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    top_k: Option<u32>,
}

impl GenerationRequest {
    /// Create a request carrying only a prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_length: None,
            num_return_sequences: None,
            temperature: None,
            top_p: None,
            top_k: None,
        }
    }

    /// Creates a new builder for `GenerationRequest`.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// The prompt with surrounding whitespace removed.
    ///
    /// Returns `None` when nothing is left.
    pub fn trimmed_prompt(&self) -> Option<&str> {
        let trimmed = self.prompt.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Fill unset or zero fields from `defaults`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chorus_core::{GenerationDefaults, GenerationRequest};
    ///
    /// let request = GenerationRequest::builder()
    ///     .prompt("Once upon a time")
    ///     .temperature(0.7_f32)
    ///     .build()
    ///     .unwrap();
    /// let params = request.resolve(&GenerationDefaults::default());
    /// assert_eq!(*params.temperature(), 0.7);
    /// assert_eq!(*params.top_k(), 50);
    /// ```
    pub fn resolve(&self, defaults: &GenerationDefaults) -> GenerationParameters {
        let mut params = GenerationParameters::from(defaults);
        let GenerationParameters {
            max_length,
            num_return_sequences,
            temperature,
            top_p,
            top_k,
            ..
        } = &mut params;
        set_if_present(max_length, self.max_length);
        set_if_present(num_return_sequences, self.num_return_sequences);
        set_if_present(temperature, self.temperature);
        set_if_present(top_p, self.top_p);
        set_if_present(top_k, self.top_k);
        params
    }
}

// Zero counts as unset.
fn set_if_present<T>(slot: &mut T, value: Option<T>)
where
    T: PartialEq + Default,
{
    if let Some(value) = value.filter(|v| *v != T::default()) {
        *slot = value;
    }
}
