use craftwatch_api::{api_status, check, dashboard, health, not_found, reset, AppState};
use craftwatch_config::Config;
use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

/// The only request bodies are the dashboard forms
const MAX_BODY_SIZE: usize = 16 * 1024;

pub fn build(config: &Config, app_state: AppState) -> Router {
    let timeout = Duration::from_secs(config.server.timeout_secs);
    let max_concurrent_requests = config.server.max_concurrent_requests;

    let mut router = Router::new()
        .route("/", get(dashboard))
        .route("/check", post(check))
        .route("/reset", post(reset))
        .route("/api/status", get(api_status))
        .route("/health", get(health))
        .fallback(not_found)
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout));

    if config.server.enable_compression {
        router = router.layer(CompressionLayer::new());
    }

    router
        .layer(build_cors_layer(&config.server.allowed_origins))
        .with_state(app_state)
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
