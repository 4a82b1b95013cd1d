//! Error types for the Magicbook workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Everything converts into [`MagicBookError`] so `?` works across crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod config;
mod error;
mod generation;
mod http;
mod json;
mod playback;
mod storage;

pub use book::{BookError, BookErrorKind};
pub use config::ConfigError;
pub use error::{MagicBookError, MagicBookErrorKind, MagicBookResult};
pub use generation::{GenerationError, GenerationErrorKind};
pub use http::HttpError;
pub use json::JsonError;
pub use playback::{PlaybackError, PlaybackErrorKind};
pub use storage::{StorageError, StorageErrorKind};
