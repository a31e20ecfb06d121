//! API key middleware for axum.
//!
//! Checks the `x-api-key` header against the configured key using a
//! constant-time comparison. When no key is configured every request passes.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post, middleware};
//!
//! let app = Router::new()
//!     .route("/api/engage", post(engage))
//!     .route_layer(middleware::from_fn_with_state(ApiKeyState::new(key), api_key_middleware));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, Secret};
use subtle::ConstantTimeEq;

use crate::adapters::http::engage::EngageResponse;

/// Header carrying the client's key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Expected API key, if any.
#[derive(Clone, Default)]
pub struct ApiKeyState {
    expected: Option<Arc<Secret<String>>>,
}

impl ApiKeyState {
    pub fn new(expected: Option<Secret<String>>) -> Self {
        Self {
            expected: expected.map(Arc::new),
        }
    }

    /// State that accepts every request.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.expected.is_some()
    }

    /// Returns true if `presented` is acceptable.
    pub fn accepts(&self, presented: Option<&str>) -> bool {
        let Some(expected) = &self.expected else {
            return true;
        };
        match presented {
            Some(key) => expected
                .expose_secret()
                .as_bytes()
                .ct_eq(key.as_bytes())
                .into(),
            None => false,
        }
    }
}

/// Rejects requests whose `x-api-key` does not match the configured key.
pub async fn api_key_middleware(
    State(state): State<ApiKeyState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    if state.accepts(presented) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        key_present = presented.is_some(),
        "rejected request with invalid API key"
    );
    (
        StatusCode::UNAUTHORIZED,
        Json(EngageResponse::error(
            "Unauthorized: Invalid or missing API key",
        )),
    )
        .into_response()
}
