//! Paragraph narration.

use super::{OpenAiClient, SpeechRequest};
use crate::NarratorSettings;
use async_trait::async_trait;
use magicbook_core::Voice;
use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use magicbook_interface::Narrator;
use tracing::{debug, instrument};

/// Narrator backed by the speech synthesis endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiNarrator {
    client: OpenAiClient,
    settings: NarratorSettings,
}

impl OpenAiNarrator {
    /// Creates a narrator.
    pub fn new(client: OpenAiClient, settings: NarratorSettings) -> Self {
        Self { client, settings }
    }

    /// Builds the request body.
    pub fn request_for(&self, text: &str, voice: &Voice) -> MagicBookResult<SpeechRequest> {
        SpeechRequest::builder()
            .model(self.settings.model().clone())
            .input(text)
            .voice(voice.as_str())
            .speed(*self.settings.speed())
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::InvalidRequest(e.to_string())).into()
            })
    }
}

#[async_trait]
impl Narrator for OpenAiNarrator {
    #[instrument(skip(self, text), fields(model = %self.settings.model(), voice = %voice, chars = text.len()))]
    async fn narrate(&self, text: &str, voice: &Voice) -> MagicBookResult<Vec<u8>> {
        let request = self.request_for(text, voice)?;
        let audio = self
            .client
            .post("audio/speech", &request)
            .await?
            .bytes()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        if audio.is_empty() {
            return Err(GenerationError::new(GenerationErrorKind::EmptyResponse(
                "speech synthesis".to_string(),
            ))
            .into());
        }

        debug!(size = audio.len(), "Received narration");
        Ok(audio.to_vec())
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
