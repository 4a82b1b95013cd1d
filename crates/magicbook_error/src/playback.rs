//! Playback error types.

/// Specific error conditions for narration playback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PlaybackErrorKind {
    /// Clip id is not registered on the surface
    #[display("Unknown clip: {}", _0)]
    UnknownClip(u64),
    /// Requested transition is not allowed from the current state
    #[display("Cannot {} a clip that is {}", action, from)]
    InvalidTransition {
        /// Current clip state
        from: String,
        /// Attempted action
        action: String,
    },
    /// Book view has been removed from the surface
    #[display("Book {} is no longer mounted", _0)]
    Detached(String),
    /// Background media task panicked or was cancelled
    #[display("Media task failed: {}", _0)]
    TaskFailed(String),
}

/// Error type for playback operations.
///
/// # Examples
///
/// ```
/// use magicbook_error::{PlaybackError, PlaybackErrorKind};
///
/// let err = PlaybackError::new(PlaybackErrorKind::UnknownClip(7));
/// assert!(format!("{}", err).contains("Unknown clip: 7"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Playback Error: {} at line {} in {}", kind, line, file)]
pub struct PlaybackError {
    /// The specific error condition
    pub kind: PlaybackErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl PlaybackError {
    /// Create a new PlaybackError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PlaybackErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
