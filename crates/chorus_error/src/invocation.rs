//! Errors raised by a single model's inference step.
//!
//! These never leave the orchestrator: they are turned into an error string in
//! the failing model's result slot.

/// Specific failure conditions for one model invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum InvocationErrorKind {
    /// The request payload could not be assembled.
    #[display("Failed to build inference request: {_0}")]
    Request(String),
    /// Transport-level failure talking to the inference backend.
    #[display("HTTP request failed: {_0}")]
    Http(String),
    /// Backend answered with a non-success status.
    #[display("Inference API returned {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Backend answered but the payload could not be decoded.
    #[display("Failed to parse inference response: {_0}")]
    ResponseParsing(String),
    /// The capability panicked while generating.
    #[display("Model panicked: {_0}")]
    Panicked(String),
}

/// Model invocation error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Invocation Error: {} at line {} in {}", kind, line, file)]
pub struct InvocationError {
    kind: InvocationErrorKind,
    line: u32,
    file: &'static str,
}

impl InvocationError {
    /// Create a new invocation error with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use chorus_error::{InvocationError, InvocationErrorKind};
    ///
    /// let err = InvocationError::new(InvocationErrorKind::Http("connection refused".into()));
    /// assert_eq!(err.kind().to_string(), "HTTP request failed: connection refused");
    /// ```
    #[track_caller]
    pub fn new(kind: InvocationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &InvocationErrorKind {
        &self.kind
    }
}

impl<T> From<T> for InvocationError
where
    T: Into<InvocationErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
