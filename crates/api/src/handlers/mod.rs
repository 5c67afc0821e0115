//! HTTP request handlers, one module per endpoint group.

pub mod payments;
pub mod process;
