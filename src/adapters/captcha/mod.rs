//! CAPTCHA adapters - implementations of the `CaptchaVerifier` port.
//!
//! - `RecaptchaVerifier` - Google reCAPTCHA v3 siteverify
//! - `DisabledCaptchaVerifier` - Accepts every token (provider `none`)

mod disabled;
mod recaptcha;

use std::sync::Arc;

pub use disabled::DisabledCaptchaVerifier;
pub use recaptcha::{evaluate, RecaptchaResponse, RecaptchaVerifier};

use crate::config::{CaptchaConfig, CaptchaProvider, ValidationError};
use crate::ports::CaptchaVerifier;

/// Builds the verifier for the configured provider.
pub fn verifier_from_config(config: &CaptchaConfig) -> Result<Arc<dyn CaptchaVerifier>, ValidationError> {
    match config.provider {
        CaptchaProvider::Recaptcha => Ok(Arc::new(RecaptchaVerifier::new(config))),
        CaptchaProvider::None => Ok(Arc::new(DisabledCaptchaVerifier)),
        CaptchaProvider::Hcaptcha => Err(ValidationError::UnsupportedCaptchaProvider(
            CaptchaProvider::Hcaptcha.as_str(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hcaptcha_is_unsupported() {
        let config = CaptchaConfig {
            provider: CaptchaProvider::Hcaptcha,
            ..Default::default()
        };
        assert!(verifier_from_config(&config).is_err());
    }

    #[test]
    fn supported_providers_build() {
        for provider in [CaptchaProvider::Recaptcha, CaptchaProvider::None] {
            let config = CaptchaConfig {
                provider,
                ..Default::default()
            };
            assert!(verifier_from_config(&config).is_ok());
        }
    }
}
