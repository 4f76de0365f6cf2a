//! Core data types for the Chorus text generation service.
//!
//! This crate provides the request, parameter, and result types shared by the
//! model registry and the orchestrator, plus the output sanitization rules.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod observability;
mod parameters;
mod request;
mod result;
mod sanitize;

pub use observability::{init_observability, shutdown_observability};
pub use parameters::{GenerationDefaults, GenerationParameters, GenerationParametersBuilder};
pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use result::{GeneratedTexts, GenerationResult};
pub use sanitize::{collapse_newlines, sanitize, strip_prompt_echo};
