//! Request-level errors surfaced to the caller of the orchestrator.

/// Request-level failure conditions.
///
/// The display text of each kind is the `detail` string returned to HTTP
/// clients.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// Caller-supplied input is invalid. No model was invoked.
    #[display("{_0}")]
    Validation(String),
    /// Unexpected failure outside the per-model isolation boundary.
    #[display("Error in text generation: {_0}")]
    Internal(String),
    /// The worker pool and its wait queue are full.
    #[display("Server is busy: {_0}")]
    Overloaded(String),
    /// The request did not finish within the configured deadline.
    #[display("Text generation timed out after {_0} seconds")]
    Timeout(u64),
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use chorus_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Internal("worker vanished".into()));
/// assert_eq!(err.detail(), "Error in text generation: worker vanished");
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    kind: GenerationErrorKind,
    line: u32,
    file: &'static str,
}

impl GenerationError {
    /// Create a new generation error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }

    /// Human-readable message without source location.
    pub fn detail(&self) -> String {
        self.kind.to_string()
    }
}

impl<T> From<T> for GenerationError
where
    T: Into<GenerationErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for request-level generation operations.
pub type ChorusResult<T> = Result<T, GenerationError>;
