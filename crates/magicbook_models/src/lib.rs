//! Remote service clients for Magicbook.
//!
//! One OpenAI-compatible HTTP client backs three drivers:
//!
//! - [`OpenAiWriter`] implements [`magicbook_interface::BookWriter`] via chat completions in JSON mode
//! - [`OpenAiIllustrator`] implements [`magicbook_interface::Illustrator`] via image generation
//! - [`OpenAiNarrator`] implements [`magicbook_interface::Narrator`] via speech synthesis
//!
//! # Example
//!
//! ```no_run
//! use magicbook_interface::BookWriter;
//! use magicbook_models::{OpenAiClient, OpenAiWriter, WriterSettings};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::from_env("OPENAI_API_KEY")?;
//! let writer = OpenAiWriter::new(client, WriterSettings::default());
//! let draft = writer.write_book("The lore of pseudo-terminals").await?;
//! println!("{} pages", draft.pages().len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod openai;
mod settings;

pub use openai::{
    ChatMessage, ChatRequest, ChatRequestBuilder, ImageRequest, ImageRequestBuilder, OpenAiClient,
    OpenAiIllustrator, OpenAiNarrator, OpenAiWriter, SpeechRequest, SpeechRequestBuilder,
    BOOK_SYSTEM_PROMPT, DEFAULT_BASE_URL,
};
pub use settings::{IllustratorSettings, NarratorSettings, WriterSettings};
