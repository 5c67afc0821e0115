//! Handler for the paid generation endpoint.

use axum::extract::{Multipart, State};
use axum::Json;
use fadecast_core::upload::{stored_file_name, validate_upload};
use fadecast_pipeline::GenerationJob;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Web path prefix under which stored originals are addressed.
const UPLOAD_WEB_PREFIX: &str = "/uploads";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `POST /process-image`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImageResponse {
    /// Web path of the stored original upload.
    pub original_image: String,
    /// URL of the synthesized aged preview.
    pub processed_image: String,
    /// Echo of the requested aging horizon.
    pub timeframe: String,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /process-image
///
/// The paid endpoint. Multipart fields: `file` (the tattoo image),
/// `timeframe` (aging horizon label), `credentialId` (single-use
/// processing credential).
///
/// Upload constraints are checked before the credential is touched, so a
/// rejected file never costs the caller their credential. The credential
/// is released only after the pipeline succeeds; a failed generation
/// leaves it paid and retryable.
pub async fn process_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ProcessImageResponse>> {
    let mut file_data: Option<(String, Option<String>, Vec<u8>)> = None;
    let mut timeframe: Option<String> = None;
    let mut credential_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let declared_mime = field.content_type().map(str::to_owned);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, declared_mime, data.to_vec()));
            }
            "timeframe" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                timeframe = Some(text);
            }
            "credentialId" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                credential_id = Some(text);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (filename, declared_mime, data) =
        file_data.ok_or_else(|| AppError::BadRequest("No image uploaded".into()))?;
    let timeframe = timeframe
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("No timeframe specified".into()))?;
    // A missing credential field fails the same way an unknown id does.
    let credential_id = credential_id.unwrap_or_default();

    // Upload constraints come before any credential or upstream spend.
    let format = validate_upload(&filename, declared_mime.as_deref(), &data)?;

    // Persist the original so the response can reference it.
    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;
    let stored_name = stored_file_name(format);
    let disk_path = state.config.upload_dir.join(&stored_name);
    tokio::fs::write(&disk_path, &data)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    state.lifecycle.consume(&credential_id).await?;

    let job = GenerationJob {
        original_image: format!("{UPLOAD_WEB_PREFIX}/{stored_name}"),
        image_bytes: data,
        mime: format.mime().to_string(),
        timeframe,
    };
    let preview = state.pipeline.run(job).await?;

    // The credential burns only once the caller has a preview in hand.
    state.lifecycle.release(&credential_id).await;

    Ok(Json(ProcessImageResponse {
        original_image: preview.original_image,
        processed_image: preview.processed_image,
        timeframe: preview.timeframe,
    }))
}
