//! Error types for the Chorus text generation service.
//!
//! Every error is a kind enum wrapped in a struct that records the source
//! location where it was raised. User-facing messages are built from the kind
//! alone so that file and line details stay in the logs.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod generation;
mod invocation;
mod registry;
mod service;

pub use config::ConfigError;
pub use generation::{ChorusResult, GenerationError, GenerationErrorKind};
pub use invocation::{InvocationError, InvocationErrorKind};
pub use registry::{RegistryError, RegistryErrorKind};
pub use service::{ServiceError, ServiceErrorKind, ServiceResult};
