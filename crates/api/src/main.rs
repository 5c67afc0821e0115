use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fadecast_api::config::ServerConfig;
use fadecast_api::{background, router, state};
use fadecast_credentials::{CredentialLifecycle, MemoryCredentialStore};
use fadecast_openai::OpenAiApi;
use fadecast_pipeline::{GenerationPipeline, OpenAiBackend};
use fadecast_stripe::{GatewayMode, LiveGateway, PaymentGateway, SimulatedGateway, StripeApi};

use state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fadecast_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Upload directory ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");
    tracing::info!(dir = %config.upload_dir.display(), "Upload directory ready");

    // --- Payment gateway ---
    let mode = GatewayMode::resolve(&config.gateway_mode, config.stripe_secret_key.as_deref())
        .expect("Invalid payment gateway configuration");
    let gateway: Arc<dyn PaymentGateway> = match mode {
        GatewayMode::Live { secret_key } => {
            let api = StripeApi::new(
                config.stripe_api_base.clone(),
                secret_key,
                Duration::from_secs(config.gateway_timeout_secs),
            )
            .expect("Failed to build Stripe client");
            tracing::info!("Payment gateway: live");
            Arc::new(LiveGateway::new(api))
        }
        GatewayMode::Simulated => {
            tracing::warn!("Payment gateway: simulated, payments settle instantly");
            Arc::new(SimulatedGateway)
        }
    };

    // --- Credential store + lifecycle ---
    let store = Arc::new(MemoryCredentialStore::new());
    let lifecycle = Arc::new(CredentialLifecycle::new(
        store.clone(),
        gateway,
        config.payment_amount_minor,
        config.payment_currency.clone(),
    ));

    // --- Generation pipeline ---
    let openai = OpenAiApi::new(
        config.openai_api_base.clone(),
        config.openai_api_key.clone(),
        Duration::from_secs(config.openai_timeout_secs),
    )
    .expect("Failed to build OpenAI client");
    let backend = Arc::new(OpenAiBackend::new(
        openai,
        config.vision_model.clone(),
        config.image_model.clone(),
    ));
    let pipeline = Arc::new(GenerationPipeline::new(backend));
    tracing::info!(
        vision_model = %config.vision_model,
        image_model = %config.image_model,
        "Generation pipeline ready"
    );

    // --- Credential sweep ---
    let sweep_cancel = tokio_util::sync::CancellationToken::new();
    let sweep_handle = tokio::spawn(background::credential_sweep::run(
        store.clone(),
        config.credential_ttl_mins,
        sweep_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        lifecycle,
        pipeline,
    };

    // --- Router ---
    let app = router::build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    sweep_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), sweep_handle).await;
    tracing::info!("Credential sweep stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
