//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Request timeout must exceed the reply pacing delay")]
    PacingExceedsTimeout,

    #[error("max_turns must be at least 1")]
    InvalidMaxTurns,

    #[error("intel_cap must be at least 1")]
    InvalidIntelCap,

    #[error("Invalid ask cap override: {0}")]
    InvalidAskCapOverride(String),

    #[error("Invalid callback URL: {0}")]
    InvalidCallbackUrl(String),

    #[error("Callback URL must use HTTPS in production")]
    CallbackMustBeHttps,

    #[error("max_attempts must be between 1 and 10")]
    InvalidMaxAttempts,
}
