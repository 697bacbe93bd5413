//! Axum router configuration.
//!
//! # Routes
//!
//! - `GET /api/start-conversation` - open a dialogue SSE stream
//! - `GET /api/health` - liveness probe
//! - `GET /` - landing payload
//! - anything else - JSON 404
//!
//! The `/api` subtree sits behind the general per-IP rate limit; every
//! response carries the baseline security headers and CORS headers.

use axum::http::HeaderValue;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

use super::handlers::{health, index, not_found, start_conversation, AppState};
use super::middleware::{rate_limit_middleware, security_headers};

/// Create the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/start-conversation", get(start_conversation))
        .route("/health", get(health))
}

/// Create the complete application router.
pub fn app_router(state: AppState, server: &ServerConfig) -> Router {
    let api = api_routes().layer(middleware::from_fn_with_state(
        Arc::clone(&state.limiter),
        rate_limit_middleware,
    ));

    Router::new()
        .nest("/api", api)
        .route("/", get(index))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: permissive unless explicit origins are configured.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
