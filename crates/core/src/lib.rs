//! Shared domain types for the fadecast service.
//!
//! Pure logic only: upload validation, shared aliases, and the core error
//! type. Nothing in this crate performs I/O or talks to external services.

pub mod error;
pub mod types;
pub mod upload;

pub use error::CoreError;
pub use types::{MinorUnits, Timestamp};
