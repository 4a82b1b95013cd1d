//! Malformed book document errors.

/// Ways an upstream book document can fail validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum BookErrorKind {
    /// Document is not valid JSON or has the wrong shape
    #[display("Failed to parse book: {}", _0)]
    Parse(String),
    /// Document has no pages
    #[display("Book has no pages")]
    NoPages,
    /// A page has a blank image description
    #[display("Page {} has an empty image description", page)]
    EmptyImageDescription {
        /// Zero-based page index
        page: usize,
    },
}

/// Error for a book document that cannot be used.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Book Error: {} at line {} in {}", kind, line, file)]
pub struct BookError {
    /// The specific error condition
    pub kind: BookErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl BookError {
    /// Create a new BookError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: BookErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
