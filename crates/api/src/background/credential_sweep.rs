//! Periodic cleanup of expired processing credentials.
//!
//! Credentials that were issued but never redeemed would otherwise sit in
//! the in-memory store forever. This task deletes any credential older
//! than the configured TTL on a fixed interval using
//! `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use fadecast_credentials::CredentialStore;
use tokio_util::sync::CancellationToken;

/// How often the sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300); // 5 minutes

/// Run the credential sweep loop.
///
/// Deletes credentials issued more than `ttl_mins` minutes ago, paid or
/// not: an abandoned paid credential past the TTL is treated as forfeit.
/// Runs until `cancel` is triggered.
pub async fn run(store: Arc<dyn CredentialStore>, ttl_mins: i64, cancel: CancellationToken) {
    tracing::info!(
        ttl_mins,
        interval_secs = SWEEP_INTERVAL.as_secs(),
        "Credential sweep started"
    );

    let mut interval = tokio::time::interval(SWEEP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Credential sweep stopping");
                break;
            }
            _ = interval.tick() => {
                let cutoff = Utc::now() - chrono::Duration::minutes(ttl_mins);
                let purged = store.purge_expired(cutoff).await;
                if purged > 0 {
                    tracing::info!(purged, "Credential sweep: removed expired credentials");
                } else {
                    tracing::debug!("Credential sweep: nothing to remove");
                }
            }
        }
    }
}
