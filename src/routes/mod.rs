use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::{middleware::from_fn_with_state, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    cors::build_cors_layer, request_id::inject_request_id, security::enforce_trusted_hosts,
};
use crate::state::AppState;

pub mod health;
pub mod leases;

pub fn v1_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .merge(leases::router())
}

/// Versioned API with every layer except rate limiting, which needs the
/// peer address and is added by `main`.
pub fn app_router(state: AppState) -> Router {
    let config = state.config.clone();
    let api = if config.api_prefix == "/" {
        v1_router()
    } else {
        Router::new().nest(&config.api_prefix, v1_router())
    };
    api
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            Duration::from_secs(config.request_timeout_seconds),
        ))
        .layer(axum::middleware::from_fn(inject_request_id))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config))
        .layer(from_fn_with_state(state.clone(), enforce_trusted_hosts))
        .with_state(state)
}
