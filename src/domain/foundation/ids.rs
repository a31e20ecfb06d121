//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::ValidationError;

/// Maximum accepted length of an externally supplied session id.
pub const MAX_SESSION_ID_LENGTH: usize = 256;

/// Identifier of an engagement session.
///
/// Session ids are supplied by the caller and used verbatim as the store key,
/// so the only checks are non-emptiness and a length bound.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Creates a SessionId, rejecting blank or oversized values.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::empty_field("sessionId"));
        }
        if value.len() > MAX_SESSION_ID_LENGTH {
            return Err(ValidationError::too_long(
                "sessionId",
                MAX_SESSION_ID_LENGTH,
                value.len(),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a single report delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryId(Uuid);

impl DeliveryId {
    /// Creates a new random DeliveryId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DeliveryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_id_accepts_external_values_verbatim() {
        let id = SessionId::new("wertyu-dfghj-ertyui").unwrap();
        assert_eq!(id.as_str(), "wertyu-dfghj-ertyui");
        assert_eq!(id.to_string(), "wertyu-dfghj-ertyui");
    }

    #[test]
    fn session_id_rejects_blank_values() {
        assert_eq!(
            SessionId::new("   "),
            Err(ValidationError::empty_field("sessionId"))
        );
        assert!(SessionId::new("").is_err());
    }

    #[test]
    fn session_id_rejects_oversized_values() {
        let long = "x".repeat(MAX_SESSION_ID_LENGTH + 1);
        assert!(matches!(
            SessionId::new(long),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn session_id_deserialization_validates() {
        let ok: Result<SessionId, _> = serde_json::from_str("\"abc\"");
        assert!(ok.is_ok());
        let blank: Result<SessionId, _> = serde_json::from_str("\"\"");
        assert!(blank.is_err());
    }

    #[test]
    fn delivery_ids_are_unique() {
        assert_ne!(DeliveryId::new(), DeliveryId::new());
    }
}
