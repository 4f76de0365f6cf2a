//! Model registry error types. Any of these is fatal to process startup.

/// Specific failure conditions while building the model registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RegistryErrorKind {
    /// A configured model could not be loaded.
    #[display("Failed to load model '{model}': {message}")]
    Load {
        /// Model identifier
        model: String,
        /// Underlying reason
        message: String,
    },
    /// The inference backend itself could not be initialized.
    #[display("Failed to initialize inference backend: {_0}")]
    Backend(String),
    /// The same identifier was registered twice.
    #[display("Model '{_0}' is registered more than once")]
    DuplicateModel(String),
}

/// Registry error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Registry Error: {} at line {} in {}", kind, line, file)]
pub struct RegistryError {
    kind: RegistryErrorKind,
    line: u32,
    file: &'static str,
}

impl RegistryError {
    /// Create a new registry error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RegistryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RegistryErrorKind {
        &self.kind
    }
}
