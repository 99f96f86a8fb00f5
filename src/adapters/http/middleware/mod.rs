//! HTTP middleware and extractors for axum.
//!
//! - `auth` - Bearer token extraction and validation

pub mod auth;

pub use auth::{bearer_token, AuthState, RequireAuth};
