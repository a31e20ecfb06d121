//! Report callback configuration

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::error::ValidationError;
use super::server::Environment;

/// Where and how final reports are delivered
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackConfig {
    /// Collector endpoint receiving report JSON
    #[serde(default = "default_url")]
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Attempts per report, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Wait before the first retry in milliseconds, doubled on each retry
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
}

impl CallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    /// Validate callback configuration
    ///
    /// In production, requires HTTPS for the collector URL.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CALLBACK__URL"));
        }
        let url = Url::parse(&self.url)
            .map_err(|e| ValidationError::InvalidCallbackUrl(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidCallbackUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if *environment == Environment::Production && url.scheme() != "https" {
            return Err(ValidationError::CallbackMustBeHttps);
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_attempts == 0 || self.max_attempts > 10 {
            return Err(ValidationError::InvalidMaxAttempts);
        }
        Ok(())
    }
}

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff(),
        }
    }
}

fn default_url() -> String {
    "https://hackathon.guvi.in/api/updateHoneyPotFinalResult".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    1_000
}
