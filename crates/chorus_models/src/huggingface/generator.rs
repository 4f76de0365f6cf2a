//! Blocking client for the Hugging Face text-generation API.

use super::dto::{
    HuggingFaceErrorBody, HuggingFaceOptions, HuggingFaceParameters, HuggingFaceRequest,
    HuggingFaceResponse,
};
use crate::{ModelLoader, TextGenerator};
use chorus_core::GenerationParameters;
use chorus_error::{InvocationError, InvocationErrorKind, RegistryError, RegistryErrorKind};
use derive_getters::Getters;
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Connection settings for the Hugging Face backend.
///
/// Loaded from the `[huggingface]` section of the service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct HuggingFaceSettings {
    /// Base URL of the inference API; the model id is appended
    #[serde(default = "default_base_url")]
    base_url: String,
    /// Base URL of the model hub, used to verify models at load time
    #[serde(default = "default_hub_url")]
    hub_url: String,
    /// Bearer token; falls back to `HF_TOKEN` when unset
    #[serde(default)]
    api_token: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
    /// Check that each model exists on the hub before accepting traffic
    #[serde(default = "default_verify_on_load")]
    verify_on_load: bool,
}

impl Default for HuggingFaceSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hub_url: default_hub_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
            verify_on_load: default_verify_on_load(),
        }
    }
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_hub_url() -> String {
    "https://huggingface.co".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_verify_on_load() -> bool {
    true
}

impl HuggingFaceSettings {
    fn token(&self) -> Option<String> {
        resolve_token(self.api_token.as_deref(), std::env::var("HF_TOKEN").ok())
    }
}

// A blank token counts as absent.
fn resolve_token(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| from_env.filter(|t| !t.is_empty()))
}

fn authorize(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Creates [`HuggingFaceGenerator`]s sharing one HTTP connection pool.
///
/// The underlying client is blocking: construct, use, and drop the loader
/// only from a blocking context.
#[derive(Debug, Clone)]
pub struct HuggingFaceLoader {
    client: Client,
    settings: HuggingFaceSettings,
    token: Option<String>,
}

impl HuggingFaceLoader {
    /// Build the shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(settings: HuggingFaceSettings) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| RegistryError::new(RegistryErrorKind::Backend(e.to_string())))?;
        let token = settings.token();
        if token.is_none() {
            warn!("No Hugging Face token configured; requests will be anonymous");
        }
        Ok(Self {
            client,
            settings,
            token,
        })
    }

    #[instrument(skip(self))]
    fn verify(&self, model_id: &str) -> Result<(), RegistryError> {
        let url = format!(
            "{}/api/models/{}",
            self.settings.hub_url.trim_end_matches('/'),
            model_id
        );
        let load_error = |message: String| {
            RegistryError::new(RegistryErrorKind::Load {
                model: model_id.to_string(),
                message,
            })
        };

        let response = authorize(self.client.get(&url), self.token.as_deref())
            .send()
            .map_err(|e| load_error(format!("hub lookup failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(load_error(format!("hub returned {}", status)));
        }
        debug!(model = model_id, "Model found on hub");
        Ok(())
    }
}

impl ModelLoader for HuggingFaceLoader {
    fn load(&self, model_id: &str, seed: u64) -> Result<Arc<dyn TextGenerator>, RegistryError> {
        if self.settings.verify_on_load {
            self.verify(model_id)?;
        }
        let endpoint = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            model_id
        );
        info!(model = model_id, endpoint = %endpoint, seed, "Registered Hugging Face model");
        Ok(Arc::new(HuggingFaceGenerator {
            client: self.client.clone(),
            model_id: model_id.to_string(),
            endpoint,
            token: self.token.clone(),
            seed,
        }))
    }
}

/// One model served by the Hugging Face inference API.
#[derive(Debug, Clone)]
pub struct HuggingFaceGenerator {
    client: Client,
    model_id: String,
    endpoint: String,
    token: Option<String>,
    seed: u64,
}

impl TextGenerator for HuggingFaceGenerator {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    #[instrument(skip(self, prompt, params), fields(model = %self.model_id))]
    fn generate(
        &self,
        prompt: &str,
        params: &GenerationParameters,
    ) -> Result<Vec<String>, InvocationError> {
        let request = HuggingFaceRequest::builder()
            .inputs(prompt)
            .parameters(HuggingFaceParameters::from_generation(params, self.seed))
            .options(HuggingFaceOptions::default())
            .build()
            .map_err(|e| InvocationErrorKind::Request(e.to_string()))?;

        debug!(
            prompt_chars = prompt.chars().count(),
            sequences = params.num_return_sequences(),
            "Sending generation request"
        );

        let response = authorize(self.client.post(&self.endpoint), self.token.as_deref())
            .json(&request)
            .send()
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                InvocationErrorKind::Http(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let message = serde_json::from_str::<HuggingFaceErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            error!(status = %status, error = %message, "Inference API error");
            return Err(InvocationErrorKind::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let candidates: Vec<HuggingFaceResponse> = response.json().map_err(|e| {
            error!(error = ?e, "Failed to parse response");
            InvocationErrorKind::ResponseParsing(e.to_string())
        })?;

        debug!(candidates = candidates.len(), "Received generation response");
        Ok(candidates
            .into_iter()
            .map(|c| c.generated_text().clone())
            .collect())
    }
}
