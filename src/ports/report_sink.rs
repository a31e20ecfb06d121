//! Report sink port.
//!
//! Delivers final reports to the external collector. Implementations make a
//! single attempt; retry policy lives with the dispatcher.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::reporting::FinalReport;

/// Errors from a single delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// Connection or transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Collector answered with a non-success status.
    #[error("collector rejected report with status {status}")]
    Rejected { status: u16 },

    /// No response within the configured timeout.
    #[error("delivery timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Report could not be encoded.
    #[error("failed to encode report: {0}")]
    Encode(String),
}

impl DeliveryError {
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn rejected(status: u16) -> Self {
        Self::Rejected { status }
    }

    /// Returns true if another attempt may succeed.
    ///
    /// Client errors other than 408 and 429 are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Network(_) | DeliveryError::Timeout { .. } => true,
            DeliveryError::Rejected { status } => {
                *status >= 500 || *status == 408 || *status == 429
            }
            DeliveryError::Encode(_) => false,
        }
    }
}

/// Port for delivering reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Sends one report.
    ///
    /// # Errors
    ///
    /// - `Network` / `Timeout` on transport failure
    /// - `Rejected` on a non-2xx response
    async fn deliver(&self, report: &FinalReport) -> Result<(), DeliveryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_sink_is_object_safe() {
        fn _accepts_dyn(_sink: &dyn ReportSink) {}
    }

    #[test]
    fn retryable_errors() {
        assert!(DeliveryError::network("reset").is_retryable());
        assert!(DeliveryError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(DeliveryError::rejected(503).is_retryable());
        assert!(DeliveryError::rejected(429).is_retryable());

        assert!(!DeliveryError::rejected(400).is_retryable());
        assert!(!DeliveryError::rejected(404).is_retryable());
        assert!(!DeliveryError::Encode("bad".into()).is_retryable());
    }
}
