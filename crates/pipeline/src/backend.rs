//! The generation seam and its OpenAI implementation.

use async_trait::async_trait;

use fadecast_openai::{ChatRequest, ImageRequest, OpenAiApi, OpenAiError};

use crate::prompts;

/// The two external calls the pipeline makes. Test doubles stand in here.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Stage 1: describe the image behind `data_uri`.
    async fn describe(&self, data_uri: &str) -> Result<String, OpenAiError>;

    /// Stage 2: synthesize an image for `prompt`. Returns a hosted URL.
    async fn synthesize(&self, prompt: &str) -> Result<String, OpenAiError>;
}

/// Production backend over the OpenAI client.
pub struct OpenAiBackend {
    api: OpenAiApi,
    vision_model: String,
    image_model: String,
}

impl OpenAiBackend {
    pub fn new(
        api: OpenAiApi,
        vision_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> Self {
        Self {
            api,
            vision_model: vision_model.into(),
            image_model: image_model.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn describe(&self, data_uri: &str) -> Result<String, OpenAiError> {
        let request = ChatRequest::vision(
            &self.vision_model,
            prompts::DESCRIBE_SYSTEM,
            prompts::DESCRIBE_USER,
            data_uri,
            prompts::DESCRIBE_MAX_TOKENS,
        );
        self.api.chat_completion(&request).await
    }

    async fn synthesize(&self, prompt: &str) -> Result<String, OpenAiError> {
        let request = ImageRequest::standard(&self.image_model, prompt);
        self.api.generate_image(&request).await
    }
}
