//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address")]
    InvalidAddress,

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Public URL must be an absolute http(s) URL")]
    InvalidPublicUrl,

    #[error("Invalid Loops base URL")]
    InvalidLoopsUrl,

    #[error("Page size must be between 1 and 50")]
    InvalidPageSize,

    #[error("CAPTCHA threshold must be between 0.0 and 1.0")]
    InvalidCaptchaThreshold,

    #[error("CAPTCHA provider '{0}' is not supported")]
    UnsupportedCaptchaProvider(&'static str),

    #[error("JWT expiration must be positive")]
    InvalidJwtExpiration,
}
