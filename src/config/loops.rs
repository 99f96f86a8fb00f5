//! Loops directory configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Loops REST API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoopsConfig {
    /// Loops API key
    pub api_key: Option<SecretString>,

    /// API base URL (override for testing)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Page size for paginated listings
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LoopsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate Loops configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let has_key = self
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());
        if !has_key {
            return Err(ValidationError::MissingRequired("LOOPS__API_KEY"));
        }
        if reqwest::Url::parse(&self.base_url).is_err() {
            return Err(ValidationError::InvalidLoopsUrl);
        }
        if self.page_size == 0 || self.page_size > 50 {
            return Err(ValidationError::InvalidPageSize);
        }
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for LoopsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            page_size: default_page_size(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://app.loops.so/api/v1".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_timeout() -> u64 {
    10
}
