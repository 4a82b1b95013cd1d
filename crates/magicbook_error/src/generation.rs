//! Remote generation service error types.

/// Specific failures of the text, image and speech services.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// API key environment variable is not set
    #[display("API key not set: {}", _0)]
    MissingApiKey(String),
    /// Request body could not be assembled
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// Transport-level failure
    #[display("Request failed: {}", _0)]
    Http(String),
    /// Service answered with a non-success status
    #[display("API error {}: {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or status text
        message: String,
    },
    /// Response body did not have the expected shape
    #[display("Failed to parse response: {}", _0)]
    ResponseParsing(String),
    /// Response was well-formed but carried no content
    #[display("Empty response from {}", _0)]
    EmptyResponse(String),
    /// Embedded payload could not be decoded
    #[display("Failed to decode payload: {}", _0)]
    Decode(String),
}

/// Error returned by a remote generation service.
///
/// # Examples
///
/// ```
/// use magicbook_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Api {
///     status: 429,
///     message: "Too Many Requests".to_string(),
/// });
/// assert!(format!("{}", err).contains("429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
