//! Upload constraints and validation for tattoo photos.
//!
//! Enforces the size cap, the extension and declared-MIME allow-lists,
//! and content sniffing. Validation is pure and runs before any credential
//! is spent, so a rejected upload never costs the caller their payment.

use image::ImageFormat;
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum accepted upload size (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Accepted file extensions (matched case-insensitively).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Accepted declared MIME types for the file part (matched
/// case-insensitively). The non-standard `image/jpg` alias is accepted.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

// ---------------------------------------------------------------------------
// Formats
// ---------------------------------------------------------------------------

/// Image formats the service accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Jpeg,
    Png,
    WebP,
}

impl UploadFormat {
    /// MIME type used for data-URI payloads.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Canonical extension for stored files.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a tattoo photo upload.
///
/// Checks, in order: non-empty body, size cap, extension allow-list,
/// declared MIME type, then the actual content (magic bytes). A file part
/// that declares no MIME type at all is rejected. The declared extension
/// is advisory; the sniffed format wins and decides the stored extension,
/// so a PNG uploaded as `photo.jpg` is accepted and stored as a PNG.
pub fn validate_upload(
    filename: &str,
    declared_mime: Option<&str>,
    bytes: &[u8],
) -> Result<UploadFormat, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("Uploaded file is empty".into()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File too large: {} bytes exceeds the {MAX_UPLOAD_BYTES} byte limit",
            bytes.len()
        )));
    }

    let ext = extension_of(filename).ok_or_else(|| {
        CoreError::Validation(format!(
            "File '{filename}' has no extension. Allowed: {ALLOWED_EXTENSIONS:?}"
        ))
    })?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Extension '{ext}' is not allowed. Allowed: {ALLOWED_EXTENSIONS:?}"
        )));
    }

    let mime = declared_mime
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty())
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "File declares no MIME type. Allowed: {ALLOWED_MIME_TYPES:?}"
            ))
        })?;
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(CoreError::Validation(format!(
            "MIME type '{mime}' is not allowed. Allowed: {ALLOWED_MIME_TYPES:?}"
        )));
    }

    sniff_format(bytes)
}

/// Lower-cased extension of `filename`, if any.
fn extension_of(filename: &str) -> Option<String> {
    let ext = filename.rsplit_once('.')?.1;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Determine the accepted format from content alone.
fn sniff_format(bytes: &[u8]) -> Result<UploadFormat, CoreError> {
    let format = image::guess_format(bytes)
        .map_err(|_| CoreError::Validation("File content is not a recognized image".into()))?;
    match format {
        ImageFormat::Jpeg => Ok(UploadFormat::Jpeg),
        ImageFormat::Png => Ok(UploadFormat::Png),
        ImageFormat::WebP => Ok(UploadFormat::WebP),
        other => Err(CoreError::Validation(format!(
            "Image format {other:?} is not allowed. Only JPEG, PNG and WebP are accepted"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Stored names
// ---------------------------------------------------------------------------

/// Collision-free filename for a stored upload.
pub fn stored_file_name(format: UploadFormat) -> String {
    format!("{}.{}", Uuid::new_v4(), format.extension())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
