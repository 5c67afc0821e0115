//! Credential lifecycle: issue, verify, consume, release.
//!
//! Owns the rules that make a credential single-use: settlement is checked
//! before any paid work, and the record is deleted only after that work
//! succeeds. A failed generation leaves the credential paid and retryable.

use std::sync::Arc;

use fadecast_core::MinorUnits;
use fadecast_stripe::{GatewayError, PaymentGateway, PaymentIntentStatus};

use crate::store::{Credential, CredentialStore};

// ---------------------------------------------------------------------------
// Outcomes and errors
// ---------------------------------------------------------------------------

/// What `issue` hands back to the request boundary.
#[derive(Debug, Clone)]
pub struct Issuance {
    pub credential_id: String,
    /// Passed to the browser for the hosted capture fields.
    pub client_secret: String,
    /// True when the backing gateway settles instantly; tells the client
    /// it can skip payment capture. Carries no authority server-side.
    pub simulated: bool,
}

/// Result of a verification attempt. `Pending` is a normal outcome, not an
/// error: the client completes payment and retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    Pending(PaymentIntentStatus),
}

/// Errors surfaced to the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The id was never issued, has expired, or was already used.
    #[error("Invalid processing credential")]
    InvalidCredential,

    /// The credential exists but settlement is not confirmed.
    #[error("Payment required")]
    PaymentRequired,

    /// The payment gateway could not be reached or rejected the call.
    #[error("Payment gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

// ---------------------------------------------------------------------------
// Lifecycle manager
// ---------------------------------------------------------------------------

/// Coordinates the store and the gateway for the full credential lifetime.
pub struct CredentialLifecycle {
    store: Arc<dyn CredentialStore>,
    gateway: Arc<dyn PaymentGateway>,
    fee_minor: MinorUnits,
    currency: String,
}

impl CredentialLifecycle {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        gateway: Arc<dyn PaymentGateway>,
        fee_minor: MinorUnits,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            store,
            gateway,
            fee_minor,
            currency: currency.into(),
        }
    }

    /// Open a payment with the gateway and issue the matching credential.
    ///
    /// A simulated gateway settles instantly, so the credential is marked
    /// paid at issue time. That is the only mode-dependent branch in the
    /// lifecycle; [`consume`](Self::consume) checks `paid` uniformly.
    pub async fn issue(&self) -> Result<Issuance, LifecycleError> {
        let handle = self
            .gateway
            .open_payment(self.fee_minor, &self.currency)
            .await?;

        let simulated = self.gateway.is_simulated();
        let mut credential = Credential::new(handle.intent_id);
        credential.paid = simulated;
        let credential_id = credential.id.clone();
        self.store.put(credential).await;

        tracing::info!(
            credential_id = %credential_id,
            simulated,
            amount_minor = self.fee_minor,
            currency = %self.currency,
            "issued processing credential"
        );
        Ok(Issuance {
            credential_id,
            client_secret: handle.client_secret,
            simulated,
        })
    }

    /// Check settlement with the gateway and flip the credential to paid.
    ///
    /// Idempotent: an already-paid credential verifies again without a
    /// gateway round trip. An unsettled intent yields
    /// [`VerifyOutcome::Pending`] and leaves the credential unpaid.
    pub async fn verify(&self, id: &str) -> Result<VerifyOutcome, LifecycleError> {
        let credential = self
            .store
            .get(id)
            .await
            .ok_or(LifecycleError::InvalidCredential)?;
        if credential.paid {
            return Ok(VerifyOutcome::Verified);
        }

        let status = self
            .gateway
            .get_status(&credential.payment_intent_id)
            .await?;
        if status.is_settled() {
            self.store.mark_paid(id).await;
            tracing::info!(credential_id = %id, status = %status, "payment verified");
            Ok(VerifyOutcome::Verified)
        } else {
            tracing::debug!(credential_id = %id, status = %status, "payment not yet settled");
            Ok(VerifyOutcome::Pending(status))
        }
    }

    /// Claim a credential for one generation run.
    ///
    /// Succeeds only for a known, paid credential. The record stays in the
    /// store until [`release`](Self::release), so a failed run can retry
    /// without paying again.
    pub async fn consume(&self, id: &str) -> Result<Credential, LifecycleError> {
        let credential = self
            .store
            .get(id)
            .await
            .ok_or(LifecycleError::InvalidCredential)?;
        if !credential.paid {
            return Err(LifecycleError::PaymentRequired);
        }
        Ok(credential)
    }

    /// Discard a credential after a successful run. Idempotent.
    pub async fn release(&self, id: &str) {
        if self.store.delete(id).await {
            tracing::info!(credential_id = %id, "credential consumed");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
