//! Single-use processing credentials.
//!
//! A credential is issued alongside a payment intent, flips to paid once
//! the processor confirms settlement, buys exactly one successful
//! generation run, and is deleted afterwards. This crate owns the store
//! seam ([`CredentialStore`]) and the lifecycle rules
//! ([`CredentialLifecycle`]): issue → verify → consume → release.

pub mod lifecycle;
pub mod store;

pub use lifecycle::{CredentialLifecycle, Issuance, LifecycleError, VerifyOutcome};
pub use store::{Credential, CredentialStore, MemoryCredentialStore};
