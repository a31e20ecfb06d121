//! HTTP DTOs for the engagement endpoint.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::handlers::{EngageMessageCommand, HistoryMessage};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One chat message as sent by the platform.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageDto {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: String,
    /// Accepted in any shape and ignored.
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
}

/// Channel details supplied with each message.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetadataDto {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

/// Request to process one inbound message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngageRequest {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub message: MessageDto,
    #[serde(default)]
    pub conversation_history: Vec<MessageDto>,
    #[serde(default)]
    pub metadata: MetadataDto,
}

impl From<EngageRequest> for EngageMessageCommand {
    fn from(req: EngageRequest) -> Self {
        let history = req
            .conversation_history
            .into_iter()
            .map(|m| HistoryMessage::new(m.sender, m.text))
            .collect();
        EngageMessageCommand::new(req.session_id, req.message.text).with_history(history)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of every engagement response, success or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngageResponse {
    pub status: String,
    pub reply: String,
}

impl EngageResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            reply: reason.into(),
        }
    }
}
