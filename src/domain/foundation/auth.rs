//! Authentication types for the domain layer.
//!
//! A subscriber authenticates with a signed "magic link" token that was
//! e-mailed to them. The token binds an e-mail address (subject) to the
//! deployment host that issued it (issuer). There are no accounts and no
//! stored sessions; possession of a valid token is the whole credential.
//!
//! # Reason codes
//!
//! Every [`AuthError`] carries a stable machine-readable reason that the HTTP
//! layer returns to clients, so the control panel can tell an expired link
//! from a forged one.

use thiserror::Error;

/// Subscriber identity extracted from a validated token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSubscriber {
    /// E-mail address bound to the token subject.
    pub email: String,
}

impl AuthenticatedSubscriber {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Returns true when the request targets the subscriber's own address.
    /// The directory normalizes addresses, so case is not significant.
    pub fn owns(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }
}

/// Authentication errors that can occur during token issue or validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("Missing bearer token")]
    MissingToken,

    /// Signature is valid but the token is past its expiry.
    #[error("Token expired")]
    ExpiredToken,

    /// Bad signature, malformed token, wrong issuer or not yet valid.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The token carries no subject to authenticate.
    #[error("Missing token subject")]
    MissingSubject,

    /// Token signing is not configured for this deployment.
    #[error("Token signing not configured: {0}")]
    NotConfigured(String),
}

impl AuthError {
    pub fn invalid(details: impl Into<String>) -> Self {
        Self::InvalidToken(details.into())
    }

    pub fn not_configured(details: impl Into<String>) -> Self {
        Self::NotConfigured(details.into())
    }

    /// Stable machine-readable reason code for API clients.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "missing-token",
            AuthError::ExpiredToken => "expired-token",
            AuthError::InvalidToken(_) => "invalid-token",
            AuthError::MissingSubject => "missing-subject",
            AuthError::NotConfigured(_) => "server-configuration-error",
        }
    }

    /// Returns true if the failure is the deployment's fault, not the caller's.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, AuthError::NotConfigured(_))
    }
}
