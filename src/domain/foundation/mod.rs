//! Foundation module - Shared domain primitives.
//!
//! Contains the authentication vocabulary shared by the token service,
//! the HTTP extractors and the subscription handlers.

mod auth;

pub use auth::{AuthError, AuthenticatedSubscriber};
