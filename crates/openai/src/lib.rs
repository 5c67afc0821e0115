//! OpenAI REST client for the two generation calls this service makes:
//! a vision chat completion (image description) and an image generation.
//!
//! [`OpenAiApi`] wraps transport and response extraction; the wire types
//! live in [`messages`]. Prompt text and model choice belong to callers.

pub mod api;
pub mod messages;

pub use api::{OpenAiApi, OpenAiError};
pub use messages::{ChatRequest, ImageRequest};
