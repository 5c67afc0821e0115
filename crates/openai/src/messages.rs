//! Wire types for the OpenAI chat-completion and image-generation calls.
//!
//! Only the fields this service sends and reads are modeled; unknown
//! response fields are ignored.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Chat completions (vision)
// ---------------------------------------------------------------------------

/// `POST /chat/completions` request body.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatRequest {
    /// A two-message vision request: a system instruction plus a user turn
    /// carrying a text part and one image as a data URI.
    pub fn vision(
        model: impl Into<String>,
        system: impl Into<String>,
        user_text: impl Into<String>,
        image_data_uri: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: MessageContent::Text(system.into()),
                },
                ChatMessage {
                    role: "user",
                    content: MessageContent::Parts(vec![
                        ContentPart::Text {
                            text: user_text.into(),
                        },
                        ContentPart::ImageUrl {
                            image_url: ImageUrl {
                                url: image_data_uri.into(),
                            },
                        },
                    ]),
                },
            ],
            max_tokens,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: MessageContent,
}

/// Message content: a plain string or a list of typed parts (the vision
/// form).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// `POST /chat/completions` response, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    /// Absent when the model returns a refusal or tool call.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Image generations
// ---------------------------------------------------------------------------

/// `POST /images/generations` request body.
#[derive(Debug, Serialize)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub n: u32,
    pub size: String,
    pub quality: String,
    pub style: String,
}

impl ImageRequest {
    /// The parameters every generation in this service uses: a single
    /// 1024x1024 image, standard quality, natural (non-stylized) style.
    pub fn standard(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            n: 1,
            size: "1024x1024".into(),
            quality: "standard".into(),
            style: "natural".into(),
        }
    }
}

/// `POST /images/generations` response, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct ImageResponse {
    pub data: Vec<GeneratedImage>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    /// Hosted result URL (the default `response_format`).
    pub url: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vision_request_serializes_to_the_openai_shape() {
        let request = ChatRequest::vision(
            "gpt-4o",
            "You are an expert.",
            "Describe this image.",
            "data:image/png;base64,AAAA",
            300,
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o");
        assert_eq!(value["max_tokens"], 300);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][0]["content"], "You are an expert.");

        let parts = &value["messages"][1]["content"];
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], "Describe this image.");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(parts[1]["image_url"]["url"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn chat_response_decodes_and_ignores_extra_fields() {
        let json = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": { "role": "assistant", "content": "A fine tattoo." },
                    "finish_reason": "stop"
                }
            ],
            "usage": { "total_tokens": 42 }
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.choices[0].message.content.as_deref(),
            Some("A fine tattoo.")
        );
    }

    #[test]
    fn chat_response_tolerates_null_content() {
        let json = r#"{ "choices": [ { "message": { "content": null } } ] }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.choices[0].message.content.is_none());
    }

    #[test]
    fn standard_image_request_fixes_the_generation_parameters() {
        let request = ImageRequest::standard("dall-e-3", "a faded tattoo");
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "dall-e-3");
        assert_eq!(value["prompt"], "a faded tattoo");
        assert_eq!(value["n"], 1);
        assert_eq!(value["size"], "1024x1024");
        assert_eq!(value["quality"], "standard");
        assert_eq!(value["style"], "natural");
    }

    #[test]
    fn image_response_decodes_result_url() {
        let json = r#"{
            "created": 1700000000,
            "data": [ { "url": "https://images.example/result.png" } ]
        }"#;
        let response: ImageResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data[0].url, "https://images.example/result.png");
    }
}
