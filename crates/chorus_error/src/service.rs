//! Startup and lifecycle errors of the service process.

use crate::{ConfigError, RegistryError};

/// Service-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ServiceErrorKind {
    /// Configuration could not be loaded or is invalid
    #[display("{_0}")]
    Config(ConfigError),
    /// Model registry failed to load
    #[display("{_0}")]
    Registry(RegistryError),
    /// Socket or other I/O failure
    #[from(ignore)]
    #[display("I/O error: {_0}")]
    Io(String),
    /// A background task panicked or was cancelled
    #[from(ignore)]
    #[display("Background task failed: {_0}")]
    Task(String),
}

/// Service error with kind discrimination.
#[derive(Debug, derive_more::Display)]
#[display("Chorus Service Error: {_0}")]
pub struct ServiceError(Box<ServiceErrorKind>);

impl ServiceError {
    /// Create a new error from a kind.
    pub fn new(kind: ServiceErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ServiceErrorKind {
        &self.0
    }
}

impl std::error::Error for ServiceError {}

impl<T> From<T> for ServiceError
where
    T: Into<ServiceErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for service lifecycle operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
