use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use fadecast_core::CoreError;
use fadecast_credentials::LifecycleError;
use fadecast_pipeline::PipelineError;
use fadecast_stripe::{GatewayError, PaymentIntentStatus};
use serde_json::json;

/// Guidance attached to generation failures so the caller knows the charge
/// was not lost.
const GENERATION_GUIDANCE: &str =
    "The image generation service reported an error. Your payment is still valid, \
     so you can try again or contact support if the problem persists.";

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain errors of the library crates and adds HTTP-specific
/// variants. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fadecast_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Credential id not present in the store.
    #[error("Invalid processing credential")]
    InvalidCredential,

    /// Credential exists but its payment was never settled.
    #[error("Payment required")]
    PaymentRequired,

    /// The processor knows the payment but has not settled it yet.
    #[error("Payment not completed")]
    PaymentPending(PaymentIntentStatus),

    /// Gateway failure while opening a payment.
    #[error("Failed to create payment intent")]
    PaymentSetup(#[source] GatewayError),

    /// Gateway failure while checking settlement.
    #[error("Payment verification failed")]
    GatewayUnavailable(#[source] GatewayError),

    /// Fatal synthesis failure in the generation pipeline.
    #[error("Image generation failed")]
    Generation(#[from] PipelineError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<LifecycleError> for AppError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::InvalidCredential => AppError::InvalidCredential,
            LifecycleError::PaymentRequired => AppError::PaymentRequired,
            // Default gateway mapping fits the verify path. The issue path
            // wraps into `PaymentSetup` at the call site instead.
            LifecycleError::Gateway(e) => AppError::GatewayUnavailable(e),
        }
    }
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- Domain validation ---
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }

            // --- Credential lifecycle ---
            AppError::InvalidCredential => (
                StatusCode::BAD_REQUEST,
                "INVALID_CREDENTIAL",
                self.to_string(),
            ),
            AppError::PaymentRequired => (
                StatusCode::PAYMENT_REQUIRED,
                "PAYMENT_REQUIRED",
                self.to_string(),
            ),
            AppError::PaymentPending(_) => (
                StatusCode::PAYMENT_REQUIRED,
                "PAYMENT_PENDING",
                self.to_string(),
            ),

            // --- Payment gateway ---
            AppError::PaymentSetup(err) => {
                tracing::error!(error = %err, "Gateway error while opening a payment");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PAYMENT_SETUP_FAILED",
                    self.to_string(),
                )
            }
            AppError::GatewayUnavailable(err) => {
                tracing::error!(error = %err, "Gateway error while checking settlement");
                (
                    StatusCode::BAD_GATEWAY,
                    "GATEWAY_ERROR",
                    self.to_string(),
                )
            }

            // --- Generation pipeline ---
            AppError::Generation(err) => {
                tracing::error!(error = %err, "Image generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "GENERATION_FAILED",
                    self.to_string(),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });

        // Contract-specific fields on top of the shared envelope.
        match &self {
            AppError::PaymentPending(payment_status) => {
                body["paymentStatus"] = json!(payment_status.as_str());
            }
            AppError::Generation(PipelineError::Synthesis(source)) => {
                body["details"] = json!(source.to_string());
                body["message"] = json!(GENERATION_GUIDANCE);
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
