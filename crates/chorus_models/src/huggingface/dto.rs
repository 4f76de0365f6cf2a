//! Hugging Face inference API data transfer objects.

use chorus_core::GenerationParameters;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Body of a text-generation call.
#[derive(Debug, Clone, Serialize, Getters, Builder)]
#[builder(setter(into))]
pub struct HuggingFaceRequest {
    /// Prompt text
    inputs: String,
    /// Generation parameters
    parameters: HuggingFaceParameters,
    /// Request options
    #[builder(default)]
    options: HuggingFaceOptions,
}

impl HuggingFaceRequest {
    /// Creates a new builder for `HuggingFaceRequest`.
    pub fn builder() -> HuggingFaceRequestBuilder {
        HuggingFaceRequestBuilder::default()
    }
}

/// Sampling parameters forwarded to the text-generation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, Builder)]
#[builder(setter(into))]
pub struct HuggingFaceParameters {
    /// Maximum length of prompt plus continuation in tokens
    max_length: u32,
    /// Number of candidates to return
    num_return_sequences: u32,
    /// Sampling temperature
    temperature: f32,
    /// Nucleus sampling threshold
    top_p: f32,
    /// Top-k cutoff
    top_k: u32,
    /// Truncate long prompts instead of failing
    truncation: bool,
    /// Sampling seed
    seed: u64,
    /// Always sample so the seed and temperature apply
    #[builder(default = "true")]
    do_sample: bool,
    /// Echo the prompt ahead of the continuation
    #[builder(default = "true")]
    return_full_text: bool,
}

impl HuggingFaceParameters {
    /// Creates a new builder for `HuggingFaceParameters`.
    pub fn builder() -> HuggingFaceParametersBuilder {
        HuggingFaceParametersBuilder::default()
    }

    /// Map resolved request parameters onto the wire format.
    pub fn from_generation(params: &GenerationParameters, seed: u64) -> Self {
        Self {
            max_length: *params.max_length(),
            num_return_sequences: *params.num_return_sequences(),
            temperature: *params.temperature(),
            top_p: *params.top_p(),
            top_k: *params.top_k(),
            truncation: *params.truncation(),
            seed,
            do_sample: true,
            return_full_text: true,
        }
    }
}

/// Request options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct HuggingFaceOptions {
    /// Block until a cold model is loaded instead of returning 503
    wait_for_model: bool,
}

impl Default for HuggingFaceOptions {
    fn default() -> Self {
        Self {
            wait_for_model: true,
        }
    }
}

/// One generated candidate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
pub struct HuggingFaceResponse {
    /// Prompt followed by the continuation
    generated_text: String,
}

/// Error payload returned with non-success statuses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct HuggingFaceErrorBody {
    pub(crate) error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let params = GenerationParameters::builder()
            .max_length(100u32)
            .num_return_sequences(2u32)
            .temperature(1.0_f32)
            .top_p(0.5_f32)
            .top_k(50u32)
            .build()
            .unwrap();
        let request = HuggingFaceRequest::builder()
            .inputs("Hello")
            .parameters(HuggingFaceParameters::from_generation(&params, 42))
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["inputs"], "Hello");
        assert_eq!(json["parameters"]["max_length"], 100);
        assert_eq!(json["parameters"]["num_return_sequences"], 2);
        assert_eq!(json["parameters"]["top_p"], 0.5);
        assert_eq!(json["parameters"]["seed"], 42);
        assert_eq!(json["parameters"]["truncation"], true);
        assert_eq!(json["parameters"]["return_full_text"], true);
        assert_eq!(json["options"]["wait_for_model"], true);
    }

    #[test]
    fn test_response_parses_candidate_list() {
        let body = r#"[{"generated_text": "Hello there"}, {"generated_text": "Hello again"}]"#;
        let candidates: Vec<HuggingFaceResponse> = serde_json::from_str(body).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].generated_text(), "Hello again");
    }
}
