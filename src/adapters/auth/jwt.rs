//! HS512 magic-link tokens.
//!
//! Tokens carry the subscriber e-mail as subject and the host that issued
//! them as issuer. Validation pins the algorithm, requires `exp` and `iss`,
//! and checks the issuer against the host the token is presented to. There
//! is no audience and no clock leeway.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AuthConfig;
use crate::domain::foundation::AuthError;
use crate::ports::TokenService;

const ALGORITHM: Algorithm = Algorithm::HS512;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    iss: String,
    #[serde(default)]
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    secret: Option<SecretString>,
    expiration: Duration,
}

impl JwtTokenService {
    pub fn new(secret: Option<SecretString>, expiration: Duration) -> Self {
        Self { secret, expiration }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.secret().cloned(), config.jwt_expiration())
    }

    fn secret(&self) -> Result<&[u8], AuthError> {
        self.secret
            .as_ref()
            .map(|secret| secret.expose_secret().as_bytes())
            .ok_or_else(|| AuthError::not_configured("JWT secret not defined"))
    }

    fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let key = EncodingKey::from_secret(self.secret()?);
        encode(&Header::new(ALGORITHM), claims, &key)
            .map_err(|e| AuthError::not_configured(format!("Failed to sign token: {}", e)))
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: &str, issuer_host: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let lifetime = i64::try_from(self.expiration.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: Some(subject.to_string()),
            iss: issuer_host.to_string(),
            iat: now,
            exp: now.saturating_add(lifetime),
        };
        tracing::debug!(issuer = issuer_host, exp = claims.exp, "Issuing token");
        self.sign(&claims)
    }

    fn validate(&self, token: &str, expected_issuer_host: &str) -> Result<String, AuthError> {
        let key = DecodingKey::from_secret(self.secret()?);

        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[expected_issuer_host]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.validate_aud = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => {
                tracing::debug!("Token expired");
                AuthError::ExpiredToken
            }
            _ => {
                tracing::debug!("Token validation failed: {}", e);
                AuthError::invalid(e.to_string())
            }
        })?;

        data.claims
            .sub
            .filter(|subject| !subject.is_empty())
            .ok_or(AuthError::MissingSubject)
    }
}
