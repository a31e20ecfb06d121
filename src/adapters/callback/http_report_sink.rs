//! HTTP Report Sink - Implementation of ReportSink for the external collector.
//!
//! Posts each report as JSON to a single callback URL.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpReportSinkConfig::new("https://collector.example/api/report")
//!     .with_timeout(Duration::from_secs(10));
//!
//! let sink = HttpReportSink::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::reporting::FinalReport;
use crate::ports::{DeliveryError, ReportSink};

/// Configuration for the HTTP report sink.
#[derive(Debug, Clone)]
pub struct HttpReportSinkConfig {
    /// Collector endpoint.
    pub url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl HttpReportSinkConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Delivers reports over HTTP.
pub struct HttpReportSink {
    config: HttpReportSinkConfig,
    client: Client,
}

impl HttpReportSink {
    /// Creates a sink with its own pooled client.
    ///
    /// # Errors
    ///
    /// Returns `Network` if the TLS backend cannot be initialised.
    pub fn new(config: HttpReportSinkConfig) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DeliveryError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }

    fn map_send_error(&self, error: reqwest::Error) -> DeliveryError {
        if error.is_timeout() {
            DeliveryError::Timeout {
                timeout_secs: self.config.timeout.as_secs(),
            }
        } else if error.is_connect() {
            DeliveryError::network(format!("connection failed: {}", error))
        } else if error.is_builder() {
            DeliveryError::Encode(error.to_string())
        } else {
            DeliveryError::network(error.to_string())
        }
    }
}

#[async_trait]
impl ReportSink for HttpReportSink {
    async fn deliver(&self, report: &FinalReport) -> Result<(), DeliveryError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(report)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            tracing::info!(
                session_id = %report.session_id,
                status = status.as_u16(),
                "report accepted by collector"
            );
            Ok(())
        } else {
            Err(DeliveryError::rejected(status.as_u16()))
        }
    }
}
