//! Top-level error wrapper types.

use crate::{
    BookError, ConfigError, GenerationError, HttpError, JsonError, PlaybackError, StorageError,
};

/// Every error condition the workspace can produce.
///
/// # Examples
///
/// ```
/// use magicbook_error::{MagicBookError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: MagicBookError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum MagicBookErrorKind {
    /// HTTP error
    #[from(HttpError)]
    Http(HttpError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Blob table or bookshelf error
    #[from(StorageError)]
    Storage(StorageError),
    /// Remote generation service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Malformed book document
    #[from(BookError)]
    Book(BookError),
    /// Narration playback error
    #[from(PlaybackError)]
    Playback(PlaybackError),
}

/// Magicbook error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Magicbook Error: {}", _0)]
pub struct MagicBookError(Box<MagicBookErrorKind>);

impl MagicBookError {
    /// Create a new error from a kind.
    pub fn new(kind: MagicBookErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MagicBookErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to MagicBookErrorKind
impl<T> From<T> for MagicBookError
where
    T: Into<MagicBookErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Magicbook operations.
///
/// # Examples
///
/// ```
/// use magicbook_error::{MagicBookResult, ConfigError};
///
/// fn load() -> MagicBookResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
/// assert!(load().is_err());
/// ```
pub type MagicBookResult<T> = std::result::Result<T, MagicBookError>;
