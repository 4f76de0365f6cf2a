//! Hugging Face text-generation inference API backend.

mod dto;
mod generator;

pub use dto::{
    HuggingFaceOptions, HuggingFaceParameters, HuggingFaceParametersBuilder, HuggingFaceRequest,
    HuggingFaceRequestBuilder, HuggingFaceResponse,
};
pub use generator::{HuggingFaceGenerator, HuggingFaceLoader, HuggingFaceSettings};
