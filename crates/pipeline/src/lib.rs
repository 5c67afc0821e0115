//! Two-stage tattoo aging pipeline.
//!
//! Stage 1 describes the uploaded tattoo with a vision model; stage 2
//! synthesizes the aged image from that description. Stage 1 is allowed
//! to fail (a fixed fallback description keeps the job alive), while a
//! stage-2 failure is fatal and surfaces to the caller.

pub mod backend;
pub mod prompts;
pub mod runner;

pub use backend::{GenerationBackend, OpenAiBackend};
pub use runner::{AgedPreview, GenerationJob, GenerationPipeline, PipelineError};
