//! Book text generation.

use super::{ChatMessage, ChatRequest, ChatResponse, OpenAiClient};
use crate::WriterSettings;
use async_trait::async_trait;
use magicbook_core::BookDraft;
use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use magicbook_interface::BookWriter;
use tracing::{info, instrument};

/// System instructions sent with every book prompt.
pub const BOOK_SYSTEM_PROMPT: &str = "You are tasked with creating illustrated infodecks based on our specifications. \
The decks present topics in a few pages with short paragraphs, like lore from USENET or an RFC. \
The output should be a JSON object in the format: \
{\"title\": \"On the Deep Structure of Pseudo-Terminals\", \"pages\": [{\"imageDescription\": \"A tree structure of abstract nodes in a technical troff typesetting layout\", \"paragraphs\": [..., ...]}, ...]}. \
It's crucial that each image description is self-contained as it will be sent to an image generator. \
In every image description, give a complete context, as well as a consistent artistic style description.";

/// Book writer backed by chat completions in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiWriter {
    client: OpenAiClient,
    settings: WriterSettings,
}

impl OpenAiWriter {
    /// Creates a writer.
    pub fn new(client: OpenAiClient, settings: WriterSettings) -> Self {
        Self { client, settings }
    }

    /// Builds the request body for `prompt`.
    pub fn request_for(&self, prompt: &str) -> MagicBookResult<ChatRequest> {
        let request = ChatRequest::builder()
            .model(self.settings.model().clone())
            .max_tokens(*self.settings.max_tokens())
            .messages(vec![
                ChatMessage::system(BOOK_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ])
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::InvalidRequest(e.to_string())))?;
        Ok(request.json_mode())
    }

    /// Extracts and validates the book from a raw completion body.
    ///
    /// # Errors
    ///
    /// `GenerationErrorKind::ResponseParsing` if the body is not a completion,
    /// `GenerationErrorKind::EmptyResponse` if it carries no content, and a
    /// book error if the content is not a valid book.
    pub fn parse_completion(body: &str) -> MagicBookResult<BookDraft> {
        let completion: ChatResponse = serde_json::from_str(body).map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::EmptyResponse(
                    "chat completion".to_string(),
                ))
            })?;

        Ok(BookDraft::parse(&content)?)
    }
}

#[async_trait]
impl BookWriter for OpenAiWriter {
    #[instrument(skip(self), fields(model = %self.settings.model()))]
    async fn write_book(&self, prompt: &str) -> MagicBookResult<BookDraft> {
        let request = self.request_for(prompt)?;
        let body = self
            .client
            .post("chat/completions", &request)
            .await?
            .text()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        let draft = Self::parse_completion(&body)?;
        info!(pages = draft.pages().len(), title = ?draft.title(), "Generated book");
        Ok(draft)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
