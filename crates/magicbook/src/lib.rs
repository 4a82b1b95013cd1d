//! Magicbook: illustrated, narrated books from a single prompt.
//!
//! A prompt goes to a text model which returns a structured book. The book
//! is stored, rendered, and filled in figure by figure with generated
//! illustrations and narration. Every generated asset goes through a
//! persistent get-or-generate cache keyed by the text it came from, so
//! reopening a book costs no further API calls. Narration clips play in
//! reading order, advancing automatically from one paragraph to the next.
//!
//! # Architecture
//!
//! - `magicbook_error` - Error types
//! - `magicbook_core` - Book data model
//! - `magicbook_interface` - Writer, illustrator and narrator traits
//! - `magicbook_storage` - Blob tables and the bookshelf
//! - `magicbook_cache` - Get-or-generate media cache
//! - `magicbook_models` - OpenAI-compatible service clients
//! - `magicbook_playback` - Book views, reading surface, sequencer
//!
//! This crate re-exports everything and adds [`Library`] and
//! [`MagicBookConfig`].
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry stdout span exporter
//! - `api` - enables tests that call the real API

mod config;
mod library;

#[cfg(feature = "observability")]
pub mod observability;

pub use config::{ApiSection, CacheSection, LibrarySection, MagicBookConfig, NarratorSection};
pub use library::{Library, OpenedBook};

pub use magicbook_cache::*;
pub use magicbook_core::*;
pub use magicbook_error::*;
pub use magicbook_interface::*;
pub use magicbook_models::*;
pub use magicbook_playback::*;
pub use magicbook_storage::*;
