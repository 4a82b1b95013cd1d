//! Request and response bodies for the OpenAI-compatible endpoints.

use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Chat message role and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`
    role: String,
    /// Message text
    content: String,
}

impl ChatMessage {
    /// A system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// A user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Requested reply format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ResponseFormat {
    #[serde(rename = "type")]
    kind: String,
}

impl ResponseFormat {
    pub(crate) fn json_object() -> Self {
        Self {
            kind: "json_object".to_string(),
        }
    }
}

/// Body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ChatRequest {
    /// Model identifier
    model: String,
    /// Maximum tokens to generate
    max_tokens: u32,
    /// Conversation
    messages: Vec<ChatMessage>,
    /// Reply format; JSON mode for book generation
    #[builder(default, setter(skip))]
    #[getter(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    /// Creates a new builder.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }

    /// Ask for a JSON object reply.
    pub fn json_mode(mut self) -> Self {
        self.response_format = Some(ResponseFormat::json_object());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub(crate) choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatReply,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatReply {
    #[serde(default)]
    pub(crate) content: Option<String>,
}

/// Body for `POST /images/generations`.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct ImageRequest {
    /// Model identifier
    model: String,
    /// Image description
    prompt: String,
    /// Number of images
    #[builder(default = "1")]
    n: u32,
    /// Image dimensions
    size: String,
    /// Delivery encoding; always base64 JSON
    #[builder(default = "\"b64_json\".to_string()")]
    response_format: String,
}

impl ImageRequest {
    /// Creates a new builder.
    pub fn builder() -> ImageRequestBuilder {
        ImageRequestBuilder::default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageResponse {
    #[serde(default)]
    pub(crate) data: Vec<ImageDatum>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImageDatum {
    #[serde(default)]
    pub(crate) b64_json: Option<String>,
}

/// Body for `POST /audio/speech`.
#[derive(Debug, Clone, Serialize, Builder, Getters)]
#[builder(setter(into))]
pub struct SpeechRequest {
    /// Model identifier
    model: String,
    /// Text to speak
    input: String,
    /// Voice identifier
    voice: String,
    /// Speed multiplier
    speed: f32,
}

impl SpeechRequest {
    /// Creates a new builder.
    pub fn builder() -> SpeechRequestBuilder {
        SpeechRequestBuilder::default()
    }
}
