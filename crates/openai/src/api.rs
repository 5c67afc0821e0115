//! REST client for the OpenAI HTTP endpoints.
//!
//! Wraps `POST /chat/completions` and `POST /images/generations` using
//! [`reqwest`], reducing each response to the one value the caller needs
//! (assistant text, result URL).

use std::time::Duration;

use crate::messages::{ChatRequest, ChatResponse, ImageRequest, ImageResponse};

/// HTTP client for an OpenAI-compatible API.
pub struct OpenAiApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Errors from the OpenAI REST layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("OpenAI request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("OpenAI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response carried no usable content (no choices, null
    /// content, or no generated image).
    #[error("OpenAI returned no usable content")]
    EmptyResponse,
}

impl OpenAiApi {
    /// Create a client against `base_url` (production:
    /// `https://api.openai.com/v1`, overridden in tests). Every call is
    /// bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, OpenAiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }

    /// Run a chat completion and return the first assistant message text.
    ///
    /// Sends `POST /chat/completions`. A response with no choices or an
    /// empty message is [`OpenAiError::EmptyResponse`].
    pub async fn chat_completion(&self, request: &ChatRequest) -> Result<String, OpenAiError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let parsed: ChatResponse = Self::parse_response(response).await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(OpenAiError::EmptyResponse)
    }

    /// Run an image generation and return the hosted result URL.
    ///
    /// Sends `POST /images/generations`.
    pub async fn generate_image(&self, request: &ImageRequest) -> Result<String, OpenAiError> {
        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let parsed: ImageResponse = Self::parse_response(response).await?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|image| image.url)
            .ok_or(OpenAiError::EmptyResponse)
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`OpenAiError::Api`] with the body text
    /// preserved; pass 2xx responses through.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, OpenAiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Decode a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
