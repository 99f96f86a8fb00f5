//! CAPTCHA configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Supported CAPTCHA providers
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaProvider {
    #[default]
    Recaptcha,
    Hcaptcha,
    /// Verification disabled; every token is accepted
    None,
}

impl CaptchaProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaptchaProvider::Recaptcha => "recaptcha",
            CaptchaProvider::Hcaptcha => "hcaptcha",
            CaptchaProvider::None => "none",
        }
    }
}

/// CAPTCHA configuration (reCAPTCHA v3)
#[derive(Debug, Clone, Deserialize)]
pub struct CaptchaConfig {
    #[serde(default)]
    pub provider: CaptchaProvider,

    /// Public site key handed to the widget
    #[serde(default)]
    pub site_key: String,

    /// Server-side verification secret
    pub secret: Option<SecretString>,

    /// Minimum score for a human
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Verification endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,
}

impl CaptchaConfig {
    /// Secret, unless unset or blank
    pub fn secret(&self) -> Option<&SecretString> {
        self.secret
            .as_ref()
            .filter(|secret| !secret.expose_secret().trim().is_empty())
    }

    /// Validate CAPTCHA configuration
    ///
    /// A missing reCAPTCHA secret is not fatal here; verification then fails
    /// per request with a configuration error.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.provider == CaptchaProvider::Hcaptcha {
            return Err(ValidationError::UnsupportedCaptchaProvider(
                CaptchaProvider::Hcaptcha.as_str(),
            ));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ValidationError::InvalidCaptchaThreshold);
        }
        Ok(())
    }
}

impl Default for CaptchaConfig {
    fn default() -> Self {
        Self {
            provider: CaptchaProvider::default(),
            site_key: String::new(),
            secret: None,
            threshold: default_threshold(),
            verify_url: default_verify_url(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

fn default_verify_url() -> String {
    "https://www.google.com/recaptcha/api/siteverify".to_string()
}
