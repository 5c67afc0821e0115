use std::sync::Arc;

use fadecast_credentials::CredentialLifecycle;
use fadecast_pipeline::GenerationPipeline;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (upload directory, fee, timeouts).
    pub config: Arc<ServerConfig>,
    /// Payment-credential lifecycle (issue, verify, consume, release).
    pub lifecycle: Arc<CredentialLifecycle>,
    /// Two-stage generation pipeline (describe, synthesize).
    pub pipeline: Arc<GenerationPipeline>,
}
