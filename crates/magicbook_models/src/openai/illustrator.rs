//! Page illustration.

use super::{ImageRequest, ImageResponse, OpenAiClient};
use crate::IllustratorSettings;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use magicbook_interface::Illustrator;
use tracing::{debug, instrument};

/// Illustrator backed by the image generation endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiIllustrator {
    client: OpenAiClient,
    settings: IllustratorSettings,
}

impl OpenAiIllustrator {
    /// Creates an illustrator.
    pub fn new(client: OpenAiClient, settings: IllustratorSettings) -> Self {
        Self { client, settings }
    }

    /// Builds the request body for `description`.
    pub fn request_for(&self, description: &str) -> MagicBookResult<ImageRequest> {
        ImageRequest::builder()
            .model(self.settings.model().clone())
            .prompt(description)
            .size(self.settings.size().clone())
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::InvalidRequest(e.to_string())).into()
            })
    }

    /// Decodes the first image of a raw response body.
    pub fn decode_response(body: &str) -> MagicBookResult<Vec<u8>> {
        let response: ImageResponse = serde_json::from_str(body).map_err(|e| {
            GenerationError::new(GenerationErrorKind::ResponseParsing(e.to_string()))
        })?;

        let encoded = response
            .data
            .into_iter()
            .next()
            .and_then(|datum| datum.b64_json)
            .ok_or_else(|| {
                GenerationError::new(GenerationErrorKind::EmptyResponse(
                    "image generation".to_string(),
                ))
            })?;

        STANDARD
            .decode(encoded.trim())
            .map_err(|e| GenerationError::new(GenerationErrorKind::Decode(e.to_string())).into())
    }
}

#[async_trait]
impl Illustrator for OpenAiIllustrator {
    #[instrument(skip(self, description), fields(model = %self.settings.model(), size = %self.settings.size()))]
    async fn illustrate(&self, description: &str) -> MagicBookResult<Vec<u8>> {
        let request = self.request_for(description)?;
        let body = self
            .client
            .post("images/generations", &request)
            .await?
            .text()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        let image = Self::decode_response(&body)?;
        debug!(size = image.len(), "Decoded image");
        Ok(image)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
