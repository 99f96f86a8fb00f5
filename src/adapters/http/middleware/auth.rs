//! Bearer authentication extractor for axum.
//!
//! `RequireAuth` validates the `Authorization: Bearer <token>` header against
//! the host of the configured public URL, so a token minted by one deployment
//! is useless on another. Request headers play no part in the issuer check.
//! Routes without the extractor never look at the
//! header, which keeps a stale token from breaking public endpoints.
//!
//! # Example
//!
//! ```ignore
//! async fn protected_handler(RequireAuth(subscriber): RequireAuth) -> String {
//!     format!("Hello, {}!", subscriber.email)
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::adapters::http::ApiError;
use crate::domain::foundation::{AuthError, AuthenticatedSubscriber};
use crate::ports::TokenService;

/// Token validation state, extracted from the application state.
///
/// `issuer_host` is the host of the configured public URL. Tokens minted
/// for any other host are rejected whatever the request headers say.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<dyn TokenService>,
    pub issuer_host: String,
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Extractor that requires a valid magic-link token.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedSubscriber);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthState {
            tokens,
            issuer_host,
        } = AuthState::from_ref(state);

        let token = bearer_token(&parts.headers).ok_or(AuthError::MissingToken)?;
        let email = tokens.validate(token, &issuer_host)?;
        Ok(RequireAuth(AuthenticatedSubscriber::new(email)))
    }
}
