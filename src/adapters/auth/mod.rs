//! Authentication adapters.
//!
//! - `JwtTokenService` - HS512 magic-link tokens implementing `TokenService`

mod jwt;

pub use jwt::JwtTokenService;
