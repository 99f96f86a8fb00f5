//! CAPTCHA verification port.

use async_trait::async_trait;

use crate::domain::subscription::SubscriptionError;

/// Action name the subscribe widget mints its CAPTCHA tokens for.
pub const SUBSCRIBE_ACTION: &str = "subscribe";

/// Verifies a client-side CAPTCHA token.
///
/// `Ok(false)` means the provider judged the requester to be a bot. Provider
/// error codes surface as `SubscriptionError` so callers can tell malformed
/// and replayed tokens apart from outages.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, action: &str, token: &str) -> Result<bool, SubscriptionError>;
}
