//! Authentication configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Inbound API key check
///
/// When no key is configured every request is accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Expected value of the `x-api-key` header
    pub api_key: Option<Secret<String>>,

    /// Refuse to start in production without an API key
    #[serde(default)]
    pub require_api_key: bool,
}

impl AuthConfig {
    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&Secret<String>> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key().is_some()
    }

    /// Validate authentication configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.require_api_key && *environment == Environment::Production && !self.is_enabled() {
            return Err(ValidationError::MissingRequired("AUTH__API_KEY"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_disabled_by_default() {
        let config = AuthConfig::default();
        assert!(!config.is_enabled());
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_blank_key_counts_as_unset() {
        let config = AuthConfig {
            api_key: Some(Secret::new("  ".to_string())),
            ..Default::default()
        };
        assert!(!config.is_enabled());
    }

    #[test]
    fn test_required_key_in_production() {
        let config = AuthConfig {
            require_api_key: true,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::MissingRequired("AUTH__API_KEY"))
        );
    }

    #[test]
    fn test_debug_output_redacts_key() {
        let config = AuthConfig {
            api_key: Some(Secret::new("super-secret".to_string())),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
