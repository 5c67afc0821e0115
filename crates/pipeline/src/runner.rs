//! Pipeline orchestration: describe, then synthesize.

use std::sync::Arc;

use crate::backend::GenerationBackend;
use crate::prompts;

// ---------------------------------------------------------------------------
// Job and result types
// ---------------------------------------------------------------------------

/// One paid generation job.
#[derive(Debug, Clone)]
pub struct GenerationJob {
    /// Web path of the stored original, echoed in the result.
    pub original_image: String,
    /// Raw upload bytes, encoded into the vision request.
    pub image_bytes: Vec<u8>,
    /// Sniffed MIME of the upload.
    pub mime: String,
    /// Opaque elapsed-time label (e.g. "10 years"), embedded in the
    /// synthesis prompt and echoed back.
    pub timeframe: String,
}

/// Successful pipeline output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgedPreview {
    pub original_image: String,
    /// Hosted URL of the synthesized image.
    pub processed_image: String,
    pub timeframe: String,
    /// Whether stage 1 fell back to the fixed description.
    pub used_fallback: bool,
}

/// Fatal pipeline failure. Only stage 2 can fail the job; stage-1 errors
/// are absorbed by the fallback description.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Image synthesis failed: {0}")]
    Synthesis(#[source] fadecast_openai::OpenAiError),
}

// ---------------------------------------------------------------------------
// Runner
// ---------------------------------------------------------------------------

/// Drives the two stages against an injected backend.
pub struct GenerationPipeline {
    backend: Arc<dyn GenerationBackend>,
}

impl GenerationPipeline {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Run both stages for one job.
    ///
    /// Any stage-1 failure (transport, non-2xx, empty content) is logged
    /// and absorbed by [`prompts::FALLBACK_DESCRIPTION`]; the job carries
    /// on. A stage-2 failure aborts with [`PipelineError::Synthesis`].
    pub async fn run(&self, job: GenerationJob) -> Result<AgedPreview, PipelineError> {
        let data_uri = prompts::image_data_uri(&job.mime, &job.image_bytes);

        let (description, used_fallback) = match self.backend.describe(&data_uri).await {
            Ok(description) => {
                tracing::info!(chars = description.len(), "tattoo described");
                (description, false)
            }
            Err(error) => {
                tracing::warn!(error = %error, "vision analysis failed, using fallback description");
                (prompts::FALLBACK_DESCRIPTION.to_string(), true)
            }
        };

        let prompt = prompts::synthesis_prompt(&job.timeframe, &description);
        let processed_image = self
            .backend
            .synthesize(&prompt)
            .await
            .map_err(PipelineError::Synthesis)?;
        tracing::info!(used_fallback, "aged preview generated");

        Ok(AgedPreview {
            original_image: job.original_image,
            processed_image,
            timeframe: job.timeframe,
            used_fallback,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
