//! Background tasks.
//!
//! Each submodule provides a long-running async function spawned from
//! `main` via `tokio::spawn` and stopped through a `CancellationToken`
//! during graceful shutdown. The only task today is the credential sweep,
//! which drops abandoned credentials once their TTL passes.

pub mod credential_sweep;
