//! Listener, logging and shutdown settings.

use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use super::error::ValidationError;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_LOG_FILTER: &str = "info,scam_honeypot=debug,tower_http=info";
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// `HONEYPOT__SERVER__*`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,

    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub log_level: String,

    /// Whole-request budget, pacing included.
    pub request_timeout_secs: u64,

    /// How long shutdown waits on undelivered reports.
    pub shutdown_grace_secs: u64,
}

/// Deployment tier. Production switches logs to JSON and demands https callbacks.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            environment: Environment::default(),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            request_timeout_secs: 30,
            shutdown_grace_secs: 15,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ValidationError::InvalidBindAddress(self.host.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=MAX_REQUEST_TIMEOUT_SECS).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_to(host: &str, port: u16) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.host = host.to_string();
        config.port = port;
        config
    }

    #[test]
    fn defaults_listen_everywhere_on_8080() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:8080");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.shutdown_grace(), Duration::from_secs(15));
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loopback_address_parses() {
        let addr = bound_to("127.0.0.1", 3000).socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(addr.ip().is_loopback());
    }

    #[test]
    fn unparseable_host_is_named_in_the_error() {
        assert_eq!(
            bound_to("not a host", 8080).validate(),
            Err(ValidationError::InvalidBindAddress("not a host".to_string()))
        );
    }

    #[test]
    fn port_zero_is_rejected() {
        assert_eq!(
            bound_to("0.0.0.0", 0).validate(),
            Err(ValidationError::InvalidPort)
        );
    }

    #[test]
    fn request_timeout_must_be_between_one_second_and_five_minutes() {
        let mut config = ServerConfig::default();
        for (secs, ok) in [(0, false), (1, true), (300, true), (301, false)] {
            config.request_timeout_secs = secs;
            assert_eq!(config.validate().is_ok(), ok, "{} seconds", secs);
        }
    }

    #[test]
    fn environment_names_are_lowercase() {
        let env: Environment = serde_json::from_str("\"production\"").unwrap();
        assert_eq!(env, Environment::Production);
    }
}
