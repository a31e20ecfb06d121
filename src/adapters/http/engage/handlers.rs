//! HTTP handlers for the engagement endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::{EngageError, EngageMessageCommand, EngageMessageHandler};
use crate::domain::foundation::{DomainError, ErrorCode};

use super::dto::{EngageRequest, EngageResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EngageHandlers {
    engage_handler: Arc<EngageMessageHandler>,
}

impl EngageHandlers {
    pub fn new(engage_handler: Arc<EngageMessageHandler>) -> Self {
        Self { engage_handler }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/engage - Process one scammer message and reply
pub async fn engage(
    State(handlers): State<EngageHandlers>,
    payload: Result<Json<EngageRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(req) => req,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "rejected engage payload");
            return (
                StatusCode::BAD_REQUEST,
                Json(EngageResponse::error("Invalid request format")),
            )
                .into_response();
        }
    };

    match handlers
        .engage_handler
        .handle(EngageMessageCommand::from(req))
        .await
    {
        Ok(result) => (StatusCode::OK, Json(EngageResponse::success(result.reply))).into_response(),
        Err(e) => handle_engage_error(e),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "OK"
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_engage_error(error: EngageError) -> Response {
    let error = DomainError::from(error);
    let (status, reply) = match error.code {
        ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
            (StatusCode::BAD_REQUEST, error.message.clone())
        }
        ErrorCode::StoreClosed | ErrorCode::SessionRetired => {
            tracing::warn!(error = %error, "engagement refused");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Service is shutting down".to_string(),
            )
        }
        ErrorCode::InvalidStateTransition | ErrorCode::InternalError => {
            tracing::error!(error = %error, "engagement failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".to_string())
        }
    };
    (status, Json(EngageResponse::error(reply))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, ValidationError};
    use axum::body::to_bytes;
    use crate::ports::SessionStoreError;

    #[tokio::test]
    async fn validation_errors_are_bad_requests() {
        let response =
            handle_engage_error(EngageError::Validation(ValidationError::empty_field("sessionId")));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: EngageResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, EngageResponse::error("sessionId is required"));
    }

    #[test]
    fn closed_store_is_unavailable() {
        let response = handle_engage_error(EngageError::Store(SessionStoreError::Closed));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn retired_lease_is_unavailable() {
        let id = SessionId::new("s1").unwrap();
        let response = handle_engage_error(EngageError::Store(SessionStoreError::Retired(id)));
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn bad_transitions_are_internal_errors() {
        let response = handle_engage_error(EngageError::StateTransition(
            ValidationError::invalid_format("state", "COMPLETE -> INIT"),
        ));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
