pub mod health;
pub mod payments;
pub mod process;

use axum::Router;

use crate::state::AppState;

/// Build the public route tree.
///
/// Route hierarchy:
///
/// ```text
/// /create-payment-intent   open a payment, issue a credential (POST)
/// /verify-payment          confirm settlement for a credential (POST)
/// /process-image           paid tattoo-aging preview (POST, multipart)
/// ```
///
/// The health check is mounted separately so it sits alongside these at
/// root level (see `crate::router`).
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Payment opening and settlement checks.
        .merge(payments::router())
        // The paid generation endpoint.
        .merge(process::router())
}
