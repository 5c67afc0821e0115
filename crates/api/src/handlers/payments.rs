//! Handlers for the payment endpoints (open intent, verify settlement).

use axum::extract::State;
use axum::Json;
use fadecast_credentials::{LifecycleError, VerifyOutcome};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /verify-payment`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub credential_id: String,
}

/// Response body for `POST /create-payment-intent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentResponse {
    /// Client secret the browser hands to the payment widget.
    pub client_secret: String,
    /// Processing credential tied to this payment.
    pub credential_id: String,
    /// True when the gateway runs in simulated mode.
    pub simulated: bool,
}

/// Response body for `POST /verify-payment`.
#[derive(Debug, Serialize)]
pub struct VerifyPaymentResponse {
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /create-payment-intent
///
/// Opens a payment with the gateway and issues the processing credential
/// that the eventual `/process-image` call must present.
pub async fn create_payment_intent(
    State(state): State<AppState>,
) -> AppResult<Json<CreatePaymentIntentResponse>> {
    let issuance = state.lifecycle.issue().await.map_err(|e| match e {
        // Opening a payment is our own setup work, so a gateway failure
        // here is a 500, not a 502.
        LifecycleError::Gateway(err) => AppError::PaymentSetup(err),
        other => other.into(),
    })?;

    Ok(Json(CreatePaymentIntentResponse {
        client_secret: issuance.client_secret,
        credential_id: issuance.credential_id,
        simulated: issuance.simulated,
    }))
}

/// POST /verify-payment
///
/// Confirms that the payment backing a credential has settled. Safe to
/// call repeatedly: once the credential is paid the gateway is not
/// consulted again, and an unsettled payment returns 402 so the client
/// can retry after completing it.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(input): Json<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    match state.lifecycle.verify(&input.credential_id).await? {
        VerifyOutcome::Verified => Ok(Json(VerifyPaymentResponse { success: true })),
        VerifyOutcome::Pending(status) => Err(AppError::PaymentPending(status)),
    }
}
