//! Magic-link token configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Token signing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS512 signing secret
    pub jwt_secret: Option<SecretString>,

    /// Token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_secs: u64,
}

impl AuthConfig {
    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    /// Secret, unless unset or blank
    pub fn secret(&self) -> Option<&SecretString> {
        self.jwt_secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
    }

    /// Validate token configuration
    ///
    /// Outside production a missing secret is tolerated; token operations
    /// then fail per request with a configuration error.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.jwt_expiration_secs == 0 {
            return Err(ValidationError::InvalidJwtExpiration);
        }
        if *environment == Environment::Production && self.secret().is_none() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_expiration_secs: default_jwt_expiration(),
        }
    }
}

/// One Julian year.
fn default_jwt_expiration() -> u64 {
    31_557_600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.jwt_expiration(), Duration::from_secs(31_557_600));
        assert!(config.secret().is_none());
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let config = AuthConfig {
            jwt_secret: Some(SecretString::new("   ".to_string())),
            ..Default::default()
        };
        assert!(config.secret().is_none());
    }

    #[test]
    fn test_production_requires_secret() {
        let config = AuthConfig::default();
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"))
        );
    }

    #[test]
    fn test_zero_expiration_rejected() {
        let config = AuthConfig {
            jwt_secret: Some(SecretString::new("secret".to_string())),
            jwt_expiration_secs: 0,
        };
        assert!(config.validate(&Environment::Development).is_err());
    }
}
