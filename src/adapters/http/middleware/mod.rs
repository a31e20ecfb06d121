//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `api_key` - shared-key authentication via the `x-api-key` header

pub mod api_key;

pub use api_key::{api_key_middleware, ApiKeyState, API_KEY_HEADER};
