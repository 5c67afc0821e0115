//! Prompt text and encoding helpers for the two generation stages.

use base64::{engine::general_purpose, Engine as _};

// ---------------------------------------------------------------------------
// Stage 1: vision description
// ---------------------------------------------------------------------------

/// System instruction for the vision analysis.
pub const DESCRIBE_SYSTEM: &str = "You are a tattoo expert. Describe the uploaded tattoo image \
     in detail, focusing on colors, style, design elements, and placement. Be concise but \
     detailed.";

/// User text accompanying the image.
pub const DESCRIBE_USER: &str = "Describe this tattoo in detail:";

/// Token budget for the description.
pub const DESCRIBE_MAX_TOKENS: u32 = 300;

/// Substituted description when stage 1 fails for any reason.
pub const FALLBACK_DESCRIPTION: &str = "A tattoo that needs to show aging effects";

/// Encode upload bytes as a data URI for the vision request.
pub fn image_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        general_purpose::STANDARD.encode(bytes)
    )
}

// ---------------------------------------------------------------------------
// Stage 2: aged-image synthesis
// ---------------------------------------------------------------------------

/// Build the synthesis prompt embedding the elapsed-time label and the
/// stage-1 description.
pub fn synthesis_prompt(timeframe: &str, description: &str) -> String {
    format!(
        "Generate a realistic image showing how this tattoo would look after {timeframe} of \
         aging. The tattoo is: {description}. Show natural fading, blurring, and color changes \
         that occur over time with tattoos. The image should look realistic and medically \
         accurate, not artistic or stylized. Show the effects of skin aging, sun exposure, and \
         ink degradation over time."
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
