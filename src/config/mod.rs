//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `MAILER_` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use mailer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod captcha;
mod company;
mod error;
mod loops;
mod server;

pub use auth::AuthConfig;
pub use captcha::{CaptchaConfig, CaptchaProvider};
pub use company::CompanyConfig;
pub use error::{ConfigError, ValidationError};
pub use loops::LoopsConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Magic-link token signing
    #[serde(default)]
    pub auth: AuthConfig,

    /// Loops directory access
    #[serde(default)]
    pub loops: LoopsConfig,

    /// CAPTCHA provider
    #[serde(default)]
    pub captcha: CaptchaConfig,

    /// Company identity
    #[serde(default)]
    pub company: CompanyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `MAILER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `MAILER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `MAILER__LOOPS__API_KEY=...` -> `loops.api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("MAILER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.loops.validate()?;
        self.captcha.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
