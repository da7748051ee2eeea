use std::net::SocketAddr;
use std::sync::Arc;

use loan_approval::app;
use loan_approval::artifacts::ArtifactStore;
use loan_approval::config::Config;
use loan_approval::handlers::AppState;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Initializes logging, loads configuration and the trained artifacts, then
/// starts the Axum server. A missing model or scaler is logged but does not
/// stop startup; every prediction then reports the model as unavailable.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loan_approval=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    let artifacts = ArtifactStore::load(&config.model_path, &config.scaler_path);
    if !artifacts.is_ready() {
        tracing::warn!("Serving in degraded mode: predictions are unavailable");
    }

    let app_state = Arc::new(AppState { artifacts });

    // Health check bypasses rate limiting
    let predictions = app::rate_limited(app::prediction_routes(), &config)?;
    let router = app::build_app(app_state, predictions);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
