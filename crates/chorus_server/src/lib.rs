//! HTTP service that fans a prompt out to every registered text generation
//! model.
//!
//! Requests enter through [`create_router`], are scheduled on a bounded
//! [`WorkerPool`] by the [`GenerationService`], and are answered by the
//! [`Orchestrator`], which invokes each model in registry order and isolates
//! per-model failures.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod api;
mod config;
mod metrics;
mod orchestrator;
mod pool;
mod server;
mod service;

pub use api::{ApiError, ApiState, create_router};
pub use config::{ChorusConfig, DEFAULT_CONFIG_FILE, ServerSettings};
pub use metrics::GenerationMetrics;
pub use orchestrator::{EMPTY_PROMPT_DETAIL, Orchestrator};
pub use pool::WorkerPool;
pub use server::{ChorusServer, shutdown_signal};
pub use service::GenerationService;
