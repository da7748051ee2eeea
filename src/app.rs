//! Router assembly shared by the binary and the integration tests.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::config::Config;
use crate::handlers::{self, AppState};

/// Largest accepted request body. An application is eleven short fields.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Form page and prediction endpoints.
pub fn prediction_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict_form))
        .route("/api/v1/predict", post(handlers::predict_json))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

/// Wraps `routes` in a per-IP rate limiter.
pub fn rate_limited(
    routes: Router<Arc<AppState>>,
    config: &Config,
) -> anyhow::Result<Router<Arc<AppState>>> {
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(config.rate_limit_per_second)
            .burst_size(config.rate_limit_burst)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .ok_or_else(|| anyhow::anyhow!("invalid rate limit configuration"))?,
    );

    Ok(routes.layer(ServiceBuilder::new().layer(GovernorLayer {
        config: governor_conf,
    })))
}

/// Final application: health check (never rate limited) merged with the
/// given prediction routes, plus tracing and CORS.
pub fn build_app(state: Arc<AppState>, predictions: Router<Arc<AppState>>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .merge(predictions)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
