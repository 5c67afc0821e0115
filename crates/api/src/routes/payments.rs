//! Route definitions for the payment endpoints.

use axum::routing::post;
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at root level.
///
/// ```text
/// POST /create-payment-intent  -> create_payment_intent
/// POST /verify-payment         -> verify_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route("/verify-payment", post(payments::verify_payment))
}
