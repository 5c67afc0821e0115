//! REST client for the Stripe payment-intent endpoints.
//!
//! Covers exactly the two calls the credential lifecycle needs: creating a
//! payment intent and reading one back for its settlement status. Requests
//! are form-encoded with bearer auth, per the Stripe wire contract.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use fadecast_core::MinorUnits;

/// HTTP client for the Stripe API.
pub struct StripeApi {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

/// Errors from the payment gateway layer.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout) or the
    /// response body could not be decoded.
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Gateway API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// The slice of a Stripe payment-intent object this service reads.
/// Unknown fields in the response are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    /// Stripe-assigned intent id (`pi_…`).
    pub id: String,
    /// Secret the browser needs to complete payment capture.
    pub client_secret: String,
    /// Current position in the intent state machine.
    pub status: PaymentIntentStatus,
}

/// Payment-intent lifecycle states, Stripe wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Succeeded,
    Canceled,
    /// Any status this build does not know about.
    #[serde(other)]
    Unknown,
}

impl PaymentIntentStatus {
    /// Whether funds are captured or guaranteed capturable. `processing`
    /// counts as settled: the processor has accepted the charge.
    pub fn is_settled(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::RequiresCapture | Self::Processing
        )
    }

    /// The wire name, for logs and response bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::RequiresConfirmation => "requires_confirmation",
            Self::RequiresAction => "requires_action",
            Self::Processing => "processing",
            Self::RequiresCapture => "requires_capture",
            Self::Succeeded => "succeeded",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for PaymentIntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl StripeApi {
    /// Create a client against `base_url` (production: `https://api.stripe.com`,
    /// overridden in tests). Every call is bounded by `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        secret_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            secret_key: secret_key.into(),
        })
    }

    /// Open a payment intent for `amount` minor units of `currency`.
    ///
    /// Sends `POST /v1/payment_intents` with automatic payment methods
    /// enabled, so the hosted capture fields choose the concrete method.
    pub async fn create_payment_intent(
        &self,
        amount: MinorUnits,
        currency: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Read a payment intent back for its current status.
    ///
    /// Sends `GET /v1/payment_intents/{id}`.
    pub async fn get_payment_intent(&self, id: &str) -> Result<PaymentIntent, GatewayError> {
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.base_url, id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Map a non-2xx response to [`GatewayError::Api`] with the body text
    /// preserved for debugging; pass 2xx responses through.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GatewayError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Decode a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
