//! Traits for the text, image and speech services.

use async_trait::async_trait;
use magicbook_core::{BookDraft, Voice};
use magicbook_error::MagicBookResult;
use std::sync::Arc;

/// Turns a free-text prompt into a structured book.
#[async_trait]
pub trait BookWriter: Send + Sync {
    /// Generate a validated draft for the prompt.
    ///
    /// A reply that does not match the expected shape is an error; there is
    /// no partial book to salvage.
    async fn write_book(&self, prompt: &str) -> MagicBookResult<BookDraft>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;
}

/// Produces raster image bytes from a description.
#[async_trait]
pub trait Illustrator: Send + Sync {
    /// Generate an image for the description.
    async fn illustrate(&self, description: &str) -> MagicBookResult<Vec<u8>>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;
}

/// Produces narration audio bytes from text.
#[async_trait]
pub trait Narrator: Send + Sync {
    /// Synthesize `text` with the given voice.
    async fn narrate(&self, text: &str, voice: &Voice) -> MagicBookResult<Vec<u8>>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<T: BookWriter + ?Sized> BookWriter for Arc<T> {
    async fn write_book(&self, prompt: &str) -> MagicBookResult<BookDraft> {
        (**self).write_book(prompt).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: Illustrator + ?Sized> Illustrator for Arc<T> {
    async fn illustrate(&self, description: &str) -> MagicBookResult<Vec<u8>> {
        (**self).illustrate(description).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T: Narrator + ?Sized> Narrator for Arc<T> {
    async fn narrate(&self, text: &str, voice: &Voice) -> MagicBookResult<Vec<u8>> {
        (**self).narrate(text, voice).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
