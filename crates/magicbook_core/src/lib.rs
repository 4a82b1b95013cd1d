//! Core data types for Magicbook.
//!
//! A [`Book`] is generated once per prompt and never changes afterwards. Its
//! pages are in presentation order, which is also narration order.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod book;
mod draft;
mod key;
mod media;
mod voice;

pub use book::{Book, Page};
pub use draft::{BookDraft, BookDraftBuilder};
pub use key::BookKey;
pub use media::MediaKind;
pub use voice::Voice;
