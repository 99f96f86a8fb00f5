//! Google reCAPTCHA v3 verification.
//!
//! Tokens are checked against the siteverify endpoint. Provider error codes
//! are mapped so that clients can tell a malformed token (400) from an
//! expired or replayed one (429). The action echoed by Google must match the
//! action the widget was rendered for, and the score must reach the
//! configured threshold.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::CaptchaConfig;
use crate::domain::subscription::{
    SubscriptionError, REASON_BAD_CAPTCHA, REASON_CAPTCHA_ACTION_MISMATCH,
};
use crate::ports::CaptchaVerifier;

/// siteverify response body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RecaptchaResponse {
    pub success: bool,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub challenge_ts: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Applies the verification rules to a siteverify response.
pub fn evaluate(
    response: &RecaptchaResponse,
    action: &str,
    threshold: f64,
) -> Result<bool, SubscriptionError> {
    if !response.error_codes.is_empty() {
        let details = format!("CAPTCHA error: {}", response.error_codes.join(", "));
        tracing::warn!(error_codes = ?response.error_codes, "CAPTCHA verification returned errors");

        let has = |code: &str| response.error_codes.iter().any(|c| c == code);
        return Err(if has("invalid-input-response") {
            SubscriptionError::bad_request_with_reason("Bad request", REASON_BAD_CAPTCHA, details)
        } else if has("timeout-or-duplicate") {
            SubscriptionError::captcha_timeout(details)
        } else {
            SubscriptionError::upstream("recaptcha", details)
        });
    }

    if !response.success {
        return Err(SubscriptionError::upstream(
            "recaptcha",
            "reCAPTCHA validation failed",
        ));
    }

    if response.action.as_deref() != Some(action) {
        tracing::warn!(
            expected = action,
            actual = ?response.action,
            "CAPTCHA action does not match"
        );
        return Err(SubscriptionError::bad_request_with_reason(
            "Bad request",
            REASON_CAPTCHA_ACTION_MISMATCH,
            "CAPTCHA error: action-mismatch",
        ));
    }

    let score = response.score.unwrap_or(0.0);
    if score < threshold {
        tracing::warn!(score, threshold, "CAPTCHA score below threshold");
        return Ok(false);
    }

    Ok(true)
}

pub struct RecaptchaVerifier {
    secret: Option<SecretString>,
    threshold: f64,
    verify_url: String,
    http_client: reqwest::Client,
}

impl RecaptchaVerifier {
    pub fn new(config: &CaptchaConfig) -> Self {
        Self {
            secret: config.secret().cloned(),
            threshold: config.threshold,
            verify_url: config.verify_url.clone(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn site_verify(&self, token: &str) -> Result<RecaptchaResponse, SubscriptionError> {
        let secret = self
            .secret
            .as_ref()
            .ok_or_else(|| SubscriptionError::configuration("CAPTCHA secret not defined"))?;

        let response = self
            .http_client
            .post(&self.verify_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[("secret", secret.expose_secret().as_str()), ("response", token)])
            .send()
            .await
            .map_err(|e| SubscriptionError::upstream("recaptcha", e.to_string()))?;

        if !response.status().is_success() {
            return Err(SubscriptionError::upstream(
                "recaptcha",
                format!("reCAPTCHA API returned status {}", response.status()),
            ));
        }

        response
            .json::<RecaptchaResponse>()
            .await
            .map_err(|e| SubscriptionError::upstream("recaptcha", e.to_string()))
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn verify(&self, action: &str, token: &str) -> Result<bool, SubscriptionError> {
        let response = self.site_verify(token).await?;
        tracing::info!(
            score = ?response.score,
            action = ?response.action,
            challenge_ts = ?response.challenge_ts,
            hostname = ?response.hostname,
            "CAPTCHA verified"
        );
        evaluate(&response, action, self.threshold)
    }
}
