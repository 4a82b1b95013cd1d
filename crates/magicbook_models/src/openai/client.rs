//! Shared HTTP client for OpenAI-compatible endpoints.

use magicbook_error::{GenerationError, GenerationErrorKind, MagicBookResult};
use reqwest::{Client, Response};
use serde::Serialize;
use tracing::{debug, instrument};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Authenticated HTTP client for an OpenAI-compatible API.
///
/// Cheap to clone; the drivers each hold their own copy.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// Creates a client reading the API key from environment variable `var`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationErrorKind::MissingApiKey` if the variable is unset
    /// or empty.
    #[instrument]
    pub fn from_env(var: &str) -> MagicBookResult<Self> {
        let api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingApiKey(var.to_string())))?;

        Ok(Self::with_api_key(api_key))
    }

    /// Creates a client with an explicit API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// API root in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body to `path` and return the response if it succeeded.
    ///
    /// # Errors
    ///
    /// Transport failures map to `GenerationErrorKind::Http`, non-2xx
    /// statuses to `GenerationErrorKind::Api`.
    #[instrument(skip(self, body), fields(base_url = %self.base_url))]
    pub(crate) async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> MagicBookResult<Response> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GenerationError::new(GenerationErrorKind::Http(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                status.canonical_reason().unwrap_or("unknown status").to_string()
            } else {
                body
            };
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message,
            })
            .into());
        }

        debug!(status = status.as_u16(), "Request succeeded");
        Ok(response)
    }
}
