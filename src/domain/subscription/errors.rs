//! Subscription error taxonomy.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | BadRequest | 400 |
//! | Unauthorized | 401 |
//! | Forbidden | 403 |
//! | ContactNotFound | 404 |
//! | SlowDown | 429 |
//! | Configuration | 500 |
//! | Upstream | 500 |
//!
//! `details` never leave the server; they are meant for the logs only.

use thiserror::Error;

use crate::domain::foundation::AuthError;

/// Reason code for a CAPTCHA score below the acceptance threshold.
pub const REASON_CAPTCHA_REJECTED: &str = "captcha-rejected";
/// Reason code for a contact that declined the subscription earlier.
pub const REASON_SUBSCRIPTION_REJECTED: &str = "subscription-rejected";
/// Reason code for an expired or replayed CAPTCHA token.
pub const REASON_CAPTCHA_TIMEOUT: &str = "captcha-timeout";
/// Reason code for a malformed CAPTCHA token.
pub const REASON_BAD_CAPTCHA: &str = "bad-captcha";
/// Reason code for a CAPTCHA token minted for another action.
pub const REASON_CAPTCHA_ACTION_MISMATCH: &str = "captcha-action-mismatch";
/// Reason code for deployment misconfiguration.
pub const REASON_CONFIGURATION: &str = "server-configuration-error";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubscriptionError {
    /// Malformed input.
    #[error("{message}")]
    BadRequest {
        message: String,
        reason: Option<&'static str>,
        details: Option<String>,
    },

    /// Missing, expired, invalid or subject-less token.
    #[error("Unauthorized")]
    Unauthorized(AuthError),

    /// Token subject does not match the requested e-mail.
    #[error("Forbidden")]
    Forbidden { details: String },

    /// Unknown contact.
    #[error("Contact not found")]
    ContactNotFound { email: String },

    /// Retry-later answer: CAPTCHA failure or a soft reject.
    #[error("{message}")]
    SlowDown {
        message: &'static str,
        reason: &'static str,
        details: String,
    },

    /// Deployment-level misconfiguration.
    #[error("Server configuration error")]
    Configuration { details: String },

    /// Directory or CAPTCHA provider failure.
    #[error("Internal server error")]
    Upstream { service: &'static str, details: String },
}

impl SubscriptionError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        SubscriptionError::BadRequest {
            message: message.into(),
            reason: None,
            details: None,
        }
    }

    /// Malformed request body; the parser message goes to the logs only.
    pub fn malformed(details: impl Into<String>) -> Self {
        SubscriptionError::BadRequest {
            message: "Malformed request".to_string(),
            reason: None,
            details: Some(details.into()),
        }
    }

    pub fn bad_request_with_reason(
        message: impl Into<String>,
        reason: &'static str,
        details: impl Into<String>,
    ) -> Self {
        SubscriptionError::BadRequest {
            message: message.into(),
            reason: Some(reason),
            details: Some(details.into()),
        }
    }

    pub fn forbidden(details: impl Into<String>) -> Self {
        SubscriptionError::Forbidden {
            details: details.into(),
        }
    }

    pub fn contact_not_found(email: impl Into<String>) -> Self {
        SubscriptionError::ContactNotFound {
            email: email.into(),
        }
    }

    /// CAPTCHA verification categorized the requester as a bot.
    pub fn captcha_rejected() -> Self {
        SubscriptionError::SlowDown {
            message: "Try again later",
            reason: REASON_CAPTCHA_REJECTED,
            details: "Requestor categorized as bot".to_string(),
        }
    }

    /// Contact declined the subscription before.
    pub fn subscription_rejected(email: &str) -> Self {
        SubscriptionError::SlowDown {
            message: "Try again later",
            reason: REASON_SUBSCRIPTION_REJECTED,
            details: format!("Contact rejected subscription before {}", email),
        }
    }

    pub fn captcha_timeout(details: impl Into<String>) -> Self {
        SubscriptionError::SlowDown {
            message: "Try again",
            reason: REASON_CAPTCHA_TIMEOUT,
            details: details.into(),
        }
    }

    pub fn configuration(details: impl Into<String>) -> Self {
        SubscriptionError::Configuration {
            details: details.into(),
        }
    }

    pub fn upstream(service: &'static str, details: impl Into<String>) -> Self {
        SubscriptionError::Upstream {
            service,
            details: details.into(),
        }
    }

    /// Stable machine-readable reason code, when there is one.
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            SubscriptionError::BadRequest { reason, .. } => *reason,
            SubscriptionError::Unauthorized(auth) => Some(auth.reason()),
            SubscriptionError::SlowDown { reason, .. } => Some(reason),
            SubscriptionError::Configuration { .. } => Some(REASON_CONFIGURATION),
            SubscriptionError::Forbidden { .. }
            | SubscriptionError::ContactNotFound { .. }
            | SubscriptionError::Upstream { .. } => None,
        }
    }

    /// Server-side diagnostic text; never sent to clients.
    pub fn details(&self) -> Option<String> {
        match self {
            SubscriptionError::BadRequest { details, .. } => details.clone(),
            SubscriptionError::Unauthorized(auth) => Some(auth.to_string()),
            SubscriptionError::Forbidden { details }
            | SubscriptionError::SlowDown { details, .. }
            | SubscriptionError::Configuration { details } => Some(details.clone()),
            SubscriptionError::ContactNotFound { email } => Some(format!("No contact for {}", email)),
            SubscriptionError::Upstream { service, details } => {
                Some(format!("{}: {}", service, details))
            }
        }
    }
}

impl From<AuthError> for SubscriptionError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotConfigured(details) => SubscriptionError::Configuration { details },
            other => SubscriptionError::Unauthorized(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captcha_and_prior_rejection_share_kind_but_not_reason() {
        let captcha = SubscriptionError::captcha_rejected();
        let rejected = SubscriptionError::subscription_rejected("test@example.com");

        assert!(matches!(captcha, SubscriptionError::SlowDown { .. }));
        assert!(matches!(rejected, SubscriptionError::SlowDown { .. }));
        assert_ne!(captcha.reason(), rejected.reason());
        assert_eq!(captcha.to_string(), rejected.to_string());
    }

    #[test]
    fn contact_not_found_message() {
        let err = SubscriptionError::contact_not_found("nobody@example.com");
        assert_eq!(err.to_string(), "Contact not found");
        assert_eq!(err.reason(), None);
    }

    #[test]
    fn auth_errors_keep_their_reason() {
        let err = SubscriptionError::from(AuthError::ExpiredToken);
        assert_eq!(err.reason(), Some("expired-token"));
        assert_eq!(err.to_string(), "Unauthorized");
    }

    #[test]
    fn unconfigured_signing_is_a_configuration_error() {
        let err = SubscriptionError::from(AuthError::not_configured("JWT secret not defined"));
        assert!(matches!(err, SubscriptionError::Configuration { .. }));
        assert_eq!(err.reason(), Some("server-configuration-error"));
    }

    #[test]
    fn malformed_hides_parser_details_from_message() {
        let err = SubscriptionError::malformed("invalid type: string, expected a sequence");
        assert_eq!(err.to_string(), "Malformed request");
        assert!(err.details().unwrap().contains("expected a sequence"));
    }

    #[test]
    fn upstream_details_name_the_service() {
        let err = SubscriptionError::upstream("loops", "503 Service Unavailable");
        assert_eq!(err.details().as_deref(), Some("loops: 503 Service Unavailable"));
        assert_eq!(err.to_string(), "Internal server error");
    }
}
