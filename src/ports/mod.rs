//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the subscription domain and the outside world. Adapters implement these
//! ports.
//!
//! - `ContactDirectory` - Contacts, mailing lists and confirmation e-mails
//! - `CaptchaVerifier` - Bot detection for the subscribe action
//! - `TokenService` - Issuing and validating magic-link tokens

mod captcha_verifier;
mod contact_directory;
mod token_service;

pub use captcha_verifier::{CaptchaVerifier, SUBSCRIBE_ACTION};
pub use contact_directory::ContactDirectory;
pub use token_service::TokenService;
