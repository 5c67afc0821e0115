//! Route definition for the paid generation endpoint.

use axum::routing::post;
use axum::Router;

use crate::handlers::process;
use crate::state::AppState;

/// Routes mounted at root level.
///
/// ```text
/// POST /process-image  -> process_image (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/process-image", post(process::process_image))
}
