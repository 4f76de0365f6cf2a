//! Inference capabilities and the model registry.
//!
//! A [`TextGenerator`] is an already-loaded model that turns a prompt into
//! candidate continuations. The [`ModelRegistry`] owns every configured
//! generator for the lifetime of the process.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod generator;
mod huggingface;
mod registry;

pub use generator::{ModelLoader, TextGenerator};
pub use huggingface::{
    HuggingFaceGenerator, HuggingFaceLoader, HuggingFaceOptions, HuggingFaceParameters,
    HuggingFaceParametersBuilder, HuggingFaceRequest, HuggingFaceRequestBuilder,
    HuggingFaceResponse, HuggingFaceSettings,
};
pub use registry::{ModelRegistry, RegisteredModel, RegistryConfig};
