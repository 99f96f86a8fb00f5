//! Magic-link token port.
//!
//! Tokens are bound to the host that issued them. A token minted for
//! `news.example.com` must be rejected when presented to another host.

use crate::domain::foundation::AuthError;

/// Issues and validates signed subscriber tokens.
///
/// # Contract
///
/// Implementations must:
/// - Return `AuthError::NotConfigured` when no signing secret is available
/// - Return `AuthError::ExpiredToken` for expired tokens
/// - Return `AuthError::InvalidToken` for bad signatures or a wrong issuer
/// - Return `AuthError::MissingSubject` for tokens without a subject
pub trait TokenService: Send + Sync {
    /// Issues a token for `subject` with `issuer_host` as issuer.
    fn issue(&self, subject: &str, issuer_host: &str) -> Result<String, AuthError>;

    /// Validates `token` and returns its subject.
    fn validate(&self, token: &str, expected_issuer_host: &str) -> Result<String, AuthError>;
}
