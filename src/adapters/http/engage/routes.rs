//! HTTP routes for the engagement endpoint.

use axum::{routing::post, Router};

use super::handlers::{engage, EngageHandlers};

/// Creates the engagement router.
pub fn engage_routes(handlers: EngageHandlers) -> Router {
    Router::new()
        .route("/engage", post(engage))
        .with_state(handlers)
}
