//! HTTP adapters - REST API implementations.
//!
//! - `engage` - `POST /api/engage` and `GET /health`
//! - `middleware` - API key check

pub mod engage;
pub mod middleware;

use std::time::Duration;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use engage::{engage_routes, health, EngageHandlers, EngageRequest, EngageResponse};
pub use middleware::{api_key_middleware, ApiKeyState};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 1 << 20;

/// Builds the full application router.
///
/// `/api/*` routes sit behind the API key check; `/health` never does.
pub fn app_router(
    handlers: EngageHandlers,
    api_key: ApiKeyState,
    request_timeout: Duration,
) -> Router {
    let api = engage_routes(handlers).route_layer(axum::middleware::from_fn_with_state(
        api_key,
        api_key_middleware,
    ));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
}
