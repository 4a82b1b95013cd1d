//! OpenAI-compatible service drivers.

mod client;
mod dto;
mod illustrator;
mod narrator;
mod writer;

pub use client::{OpenAiClient, DEFAULT_BASE_URL};
pub use dto::{
    ChatMessage, ChatRequest, ChatRequestBuilder, ImageRequest, ImageRequestBuilder,
    SpeechRequest, SpeechRequestBuilder,
};
pub use illustrator::OpenAiIllustrator;
pub use narrator::OpenAiNarrator;
pub use writer::{OpenAiWriter, BOOK_SYSTEM_PROMPT};

pub(crate) use dto::{ChatResponse, ImageResponse, ResponseFormat};
