//! Credential records and the store seam.
//!
//! The store holds issued credentials for the life of the process. The
//! trait keeps callers agnostic of the backing map so a durable store can
//! replace [`MemoryCredentialStore`] without touching lifecycle logic.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use fadecast_core::Timestamp;

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// A single-use processing right tied to one payment intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Opaque id handed to the client.
    pub id: String,
    /// Processor-side payment intent backing this credential.
    pub payment_intent_id: String,
    /// Settlement confirmed. Moves false → true, never back.
    pub paid: bool,
    /// Issue time; drives the expiry sweep.
    pub issued_at: Timestamp,
}

impl Credential {
    /// New unpaid credential with a fresh v7 id (timestamp + random
    /// components in one opaque string).
    pub fn new(payment_intent_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            payment_intent_id: payment_intent_id.into(),
            paid: false,
            issued_at: chrono::Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// Store seam
// ---------------------------------------------------------------------------

/// Storage for issued credentials.
///
/// Each method is a single atomic operation on the backing map; there is no
/// cross-call transaction. Implementations must never invent records:
/// `mark_paid` and `delete` report whether the id existed.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert or replace a credential.
    async fn put(&self, credential: Credential);

    /// Look up a credential by id.
    async fn get(&self, id: &str) -> Option<Credential>;

    /// Remove a credential. Returns false when the id was absent.
    async fn delete(&self, id: &str) -> bool;

    /// Flip `paid` to true. Returns false when the id was absent.
    async fn mark_paid(&self, id: &str) -> bool;

    /// Remove credentials issued before `cutoff`. Returns how many were
    /// removed.
    async fn purge_expired(&self, cutoff: Timestamp) -> usize;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-lifetime store over an `RwLock`'d map.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<HashMap<String, Credential>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live credentials.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn put(&self, credential: Credential) {
        self.records
            .write()
            .await
            .insert(credential.id.clone(), credential);
    }

    async fn get(&self, id: &str) -> Option<Credential> {
        self.records.read().await.get(id).cloned()
    }

    async fn delete(&self, id: &str) -> bool {
        self.records.write().await.remove(id).is_some()
    }

    async fn mark_paid(&self, id: &str) -> bool {
        match self.records.write().await.get_mut(id) {
            Some(record) => {
                record.paid = true;
                true
            }
            None => false,
        }
    }

    async fn purge_expired(&self, cutoff: Timestamp) -> usize {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, credential| credential.issued_at >= cutoff);
        before - records.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_credentials_start_unpaid_with_unique_ids() {
        let a = Credential::new("pi_1");
        let b = Credential::new("pi_2");
        assert!(!a.paid);
        assert_ne!(a.id, b.id);
        assert_eq!(a.payment_intent_id, "pi_1");
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryCredentialStore::new();
        let credential = Credential::new("pi_1");
        let id = credential.id.clone();
        store.put(credential.clone()).await;
        assert_eq!(store.get(&id).await.unwrap(), credential);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let store = MemoryCredentialStore::new();
        assert!(store.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn delete_reports_presence() {
        let store = MemoryCredentialStore::new();
        let credential = Credential::new("pi_1");
        let id = credential.id.clone();
        store.put(credential).await;
        assert!(store.delete(&id).await);
        assert!(!store.delete(&id).await);
        assert!(store.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn mark_paid_flips_the_flag() {
        let store = MemoryCredentialStore::new();
        let credential = Credential::new("pi_1");
        let id = credential.id.clone();
        store.put(credential).await;
        assert!(store.mark_paid(&id).await);
        assert!(store.get(&id).await.unwrap().paid);
    }

    #[tokio::test]
    async fn mark_paid_never_invents_records() {
        let store = MemoryCredentialStore::new();
        assert!(!store.mark_paid("nope").await);
        assert!(store.get("nope").await.is_none());
    }

    #[tokio::test]
    async fn purge_expired_removes_only_older_records() {
        let store = MemoryCredentialStore::new();
        let mut old = Credential::new("pi_old");
        old.issued_at = chrono::Utc::now() - Duration::hours(2);
        let old_id = old.id.clone();
        let fresh = Credential::new("pi_fresh");
        let fresh_id = fresh.id.clone();
        store.put(old).await;
        store.put(fresh).await;

        let cutoff = chrono::Utc::now() - Duration::hours(1);
        assert_eq!(store.purge_expired(cutoff).await, 1);
        assert!(store.get(&old_id).await.is_none());
        assert!(store.get(&fresh_id).await.is_some());
        assert_eq!(store.count().await, 1);
    }
}
