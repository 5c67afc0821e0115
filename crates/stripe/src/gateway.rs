//! The payment seam between the credential lifecycle and the processor.
//!
//! `PaymentGateway` is the single trait test doubles stand in for. The
//! live implementation defers to [`StripeApi`]; the simulated one settles
//! every payment instantly and exists so the service can run end to end
//! without processor credentials.

use async_trait::async_trait;
use rand::Rng;

use fadecast_core::{CoreError, MinorUnits};

use crate::api::{GatewayError, PaymentIntentStatus, StripeApi};

// ---------------------------------------------------------------------------
// Seam
// ---------------------------------------------------------------------------

/// A freshly opened payment: what the client needs to capture funds.
#[derive(Debug, Clone)]
pub struct PaymentHandle {
    /// Processor-side intent id, stored on the credential.
    pub intent_id: String,
    /// Handed to the browser for the hosted capture fields.
    pub client_secret: String,
}

/// Payment processor operations the credential lifecycle depends on.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment for `amount` minor units of `currency`.
    async fn open_payment(
        &self,
        amount: MinorUnits,
        currency: &str,
    ) -> Result<PaymentHandle, GatewayError>;

    /// Current settlement status of a previously opened payment.
    async fn get_status(&self, intent_id: &str) -> Result<PaymentIntentStatus, GatewayError>;

    /// True when this gateway settles instantly without a processor.
    fn is_simulated(&self) -> bool;
}

// ---------------------------------------------------------------------------
// Live gateway
// ---------------------------------------------------------------------------

/// Gateway backed by the real Stripe API.
pub struct LiveGateway {
    api: StripeApi,
}

impl LiveGateway {
    pub fn new(api: StripeApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PaymentGateway for LiveGateway {
    async fn open_payment(
        &self,
        amount: MinorUnits,
        currency: &str,
    ) -> Result<PaymentHandle, GatewayError> {
        let intent = self.api.create_payment_intent(amount, currency).await?;
        Ok(PaymentHandle {
            intent_id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    async fn get_status(&self, intent_id: &str) -> Result<PaymentIntentStatus, GatewayError> {
        let intent = self.api.get_payment_intent(intent_id).await?;
        Ok(intent.status)
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

// ---------------------------------------------------------------------------
// Simulated gateway
// ---------------------------------------------------------------------------

/// Instant-settlement gateway for deployments without processor
/// credentials. Startup validation guarantees it is never paired with a
/// live secret key; see [`GatewayMode::resolve`].
#[derive(Debug, Default)]
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn open_payment(
        &self,
        amount: MinorUnits,
        currency: &str,
    ) -> Result<PaymentHandle, GatewayError> {
        let suffix: String = rand::rng()
            .sample_iter(&rand::distr::Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();
        let intent_id = format!("pi_sim_{suffix}");
        let client_secret = format!("{intent_id}_secret_sim");
        tracing::debug!(intent_id = %intent_id, amount, currency, "opened simulated payment");
        Ok(PaymentHandle {
            intent_id,
            client_secret,
        })
    }

    async fn get_status(&self, _intent_id: &str) -> Result<PaymentIntentStatus, GatewayError> {
        Ok(PaymentIntentStatus::Succeeded)
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

/// How the service talks to the payment processor. Resolved once at
/// startup from explicit configuration; nothing re-detects mode per call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayMode {
    /// Real Stripe calls with this secret key.
    Live { secret_key: String },
    /// Instant settlement, no processor involved.
    Simulated,
}

impl GatewayMode {
    /// Resolve the configured mode name against the optional secret key.
    ///
    /// Rejects the two combinations that must never boot: `live` without a
    /// key, and `simulated` alongside a live (`sk_live…`) key.
    pub fn resolve(mode: &str, secret_key: Option<&str>) -> Result<Self, CoreError> {
        let key = secret_key.map(str::trim).filter(|k| !k.is_empty());
        match mode {
            "live" => match key {
                Some(key) => Ok(Self::Live {
                    secret_key: key.to_string(),
                }),
                None => Err(CoreError::Validation(
                    "GATEWAY_MODE=live requires STRIPE_SECRET_KEY".into(),
                )),
            },
            "simulated" => {
                if key.is_some_and(|k| k.starts_with("sk_live")) {
                    return Err(CoreError::Validation(
                        "GATEWAY_MODE=simulated must not be combined with a live Stripe key"
                            .into(),
                    ));
                }
                Ok(Self::Simulated)
            }
            other => Err(CoreError::Validation(format!(
                "Unknown gateway mode '{other}'. Must be one of: live, simulated"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
