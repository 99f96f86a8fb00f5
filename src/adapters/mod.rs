//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `loops` - Loops contact directory (REST client, in-memory double)
//! - `captcha` - CAPTCHA verification (reCAPTCHA v3, disabled)
//! - `auth` - HS512 magic-link tokens
//! - `http` - axum REST API

pub mod auth;
pub mod captcha;
pub mod http;
pub mod loops;
