//! Service configuration.
//!
//! Layered from built-in defaults, an optional TOML file, then `CHORUS_*`
//! environment variables (`CHORUS_SERVER__PORT=9000`,
//! `CHORUS_REGISTRY__MODELS=gpt2,distilgpt2`).

use chorus_core::GenerationDefaults;
use chorus_error::ConfigError;
use chorus_models::{HuggingFaceSettings, RegistryConfig};
use config::{Config, ConfigBuilder, Environment, File, FileFormat, builder::DefaultState};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, instrument};

/// Config file read when no path is given explicitly.
pub const DEFAULT_CONFIG_FILE: &str = "chorus.toml";

/// Top-level service configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChorusConfig {
    /// HTTP listener and worker pool settings
    #[serde(default)]
    pub server: ServerSettings,
    /// Fallbacks for unset request parameters
    #[serde(default)]
    pub generation: GenerationDefaults,
    /// Models to load at startup
    #[serde(default)]
    pub registry: RegistryConfig,
    /// Hugging Face backend connection
    #[serde(default)]
    pub huggingface: HuggingFaceSettings,
}

impl ChorusConfig {
    /// Load configuration from `path` (or [`DEFAULT_CONFIG_FILE`] if present)
    /// and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given file is missing, a source
    /// cannot be parsed, or the result fails validation.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };
        Self::finish(with_environment(builder))
    }

    /// Parse configuration from TOML text, without consulting the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema or the
    /// result fails validation.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::finish(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder
            .build()
            .and_then(|c| c.try_deserialize::<Self>())
            .map_err(|e| ConfigError::new(e.to_string()))?;
        config.validate()?;
        debug!(
            models = ?config.registry.models(),
            bind = %config.server.bind_address(),
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Reject settings the service cannot run with.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_concurrent == 0 {
            return Err(ConfigError::new("server.max_concurrent must be at least 1"));
        }
        let admitted = self
            .server
            .max_concurrent
            .checked_add(self.server.queue_depth)
            .filter(|total| *total <= Semaphore::MAX_PERMITS);
        if admitted.is_none() {
            return Err(ConfigError::new(format!(
                "server.max_concurrent + server.queue_depth must not exceed {}",
                Semaphore::MAX_PERMITS
            )));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::new(
                "server.request_timeout_secs must be at least 1",
            ));
        }
        if *self.generation.max_length() == 0 {
            return Err(ConfigError::new("generation.max_length must be at least 1"));
        }
        if *self.generation.num_return_sequences() == 0 {
            return Err(ConfigError::new(
                "generation.num_return_sequences must be at least 1",
            ));
        }
        if self.registry.models().iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::new("registry.models contains an empty identifier"));
        }
        Ok(())
    }
}

fn with_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("CHORUS")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("registry.models")
            .try_parsing(true),
    )
}

/// HTTP listener and worker pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind
    #[serde(default = "default_port")]
    pub port: u16,
    /// Generations allowed to run at the same time
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Requests allowed to wait for a free worker before new ones are rejected
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
    /// Upper bound on one request's wait plus generation time
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Metrics export interval when the `metrics` feature is enabled
    #[serde(default = "default_metrics_export_interval_secs")]
    pub metrics_export_interval_secs: u64,
}

impl ServerSettings {
    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Request deadline as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_concurrent: default_max_concurrent(),
            queue_depth: default_queue_depth(),
            request_timeout_secs: default_request_timeout_secs(),
            metrics_export_interval_secs: default_metrics_export_interval_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_concurrent() -> usize {
    4
}

fn default_queue_depth() -> usize {
    32
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_metrics_export_interval_secs() -> u64 {
    60
}
