//! SubscribeHandler - First step of the double opt-in.
//!
//! The e-mail address is unverified at this point. The handler gates the
//! request behind CAPTCHA, records the contact as pending and mails a
//! magic link to the control panel. Contacts that already accepted every
//! requested list are not mailed again.

use std::sync::Arc;

use reqwest::Url;

use crate::domain::subscription::{
    ContactProperties, SubscriptionError, LANGUAGE_PROPERTY, REFERER_PROPERTY,
};
use crate::ports::{CaptchaVerifier, ContactDirectory, TokenService, SUBSCRIBE_ACTION};

/// Path of the control panel page the magic link points to.
pub const CONTROL_PANEL_PATH: &str = "/control-panel";

/// Command to start a subscription.
#[derive(Debug, Clone)]
pub struct SubscribeCommand {
    pub email: String,
    pub captcha_token: String,
    /// `None` or empty means every public list.
    pub mailing_lists: Option<Vec<String>>,
    /// Preferred language, ISO 639.
    pub language: Option<String>,
    /// Page that initiated the subscription.
    pub referer: Option<String>,
    /// Free-form contact properties.
    pub properties: ContactProperties,
    /// Configured public origin of the deployment, e.g.
    /// `https://news.example.com`. Never taken from request headers.
    pub origin: Url,
}

/// Result of a successful subscribe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscribeResult {
    pub email: String,
    /// True when a confirmation e-mail was sent.
    pub double_opt_in: bool,
}

/// Builds `<origin>/control-panel?token=..[&lang=..]`.
pub fn control_panel_url(
    origin: &Url,
    token: &str,
    language: Option<&str>,
) -> Result<Url, SubscriptionError> {
    let mut url = origin
        .join(CONTROL_PANEL_PATH)
        .map_err(|e| SubscriptionError::configuration(format!("Invalid origin {}: {}", origin, e)))?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("token", token);
        if let Some(language) = language {
            query.append_pair("lang", language);
        }
    }
    Ok(url)
}

/// Handler for subscribe requests.
pub struct SubscribeHandler {
    directory: Arc<dyn ContactDirectory>,
    captcha: Arc<dyn CaptchaVerifier>,
    tokens: Arc<dyn TokenService>,
}

impl SubscribeHandler {
    pub fn new(
        directory: Arc<dyn ContactDirectory>,
        captcha: Arc<dyn CaptchaVerifier>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            directory,
            captcha,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: SubscribeCommand) -> Result<SubscribeResult, SubscriptionError> {
        // 1. Validate shape
        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(SubscriptionError::bad_request("Missing email"));
        }
        if cmd.captcha_token.trim().is_empty() {
            return Err(SubscriptionError::bad_request("Missing CAPTCHA token"));
        }
        let issuer_host = cmd
            .origin
            .host_str()
            .ok_or_else(|| SubscriptionError::configuration(format!("Public URL {} has no host", cmd.origin)))?;

        // 2. Gate behind CAPTCHA
        if !self.captcha.verify(SUBSCRIBE_ACTION, &cmd.captcha_token).await? {
            return Err(SubscriptionError::captcha_rejected());
        }

        // 3. Record the contact
        let language = cmd.language.as_deref().filter(|language| !language.is_empty());
        let mut properties = cmd.properties.without_reserved();
        if let Some(language) = language {
            properties.insert(LANGUAGE_PROPERTY, language);
        }
        if let Some(referer) = cmd.referer.as_deref().filter(|referer| !referer.is_empty()) {
            properties.insert(REFERER_PROPERTY, referer);
        }

        let requested = cmd.mailing_lists.unwrap_or_default();
        let contact = self
            .directory
            .upsert_contact(email, &properties, Some(requested.as_slice()))
            .await?;

        // 4. Short-circuit on a settled status
        if contact.is_rejected() {
            return Err(SubscriptionError::subscription_rejected(&contact.email));
        }
        if contact.is_accepted() && contact.is_member_of_all(&requested) {
            tracing::info!(contact_id = %contact.id, "Already subscribed to all requested lists");
            return Ok(SubscribeResult {
                email: contact.email,
                double_opt_in: false,
            });
        }

        // 5. Mail the magic link
        let token = self.tokens.issue(&contact.email, issuer_host)?;
        let url = control_panel_url(&cmd.origin, &token, language)?;
        self.directory
            .send_confirmation_mail(&contact.email, url.as_str(), language)
            .await?;

        tracing::info!(contact_id = %contact.id, "Confirmation e-mail sent");

        Ok(SubscribeResult {
            email: contact.email,
            double_opt_in: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::subscription::test_support::{
        contact, FixedCaptcha, MockDirectory, StaticTokens,
    };
    use crate::domain::subscription::{OptInStatus, CUSTOM_OPT_IN_STATUS_PROPERTY};

    fn command(email: &str, lists: Option<Vec<&str>>) -> SubscribeCommand {
        SubscribeCommand {
            email: email.to_string(),
            captcha_token: "captcha".to_string(),
            mailing_lists: lists.map(|lists| lists.into_iter().map(str::to_string).collect()),
            language: Some("pl".to_string()),
            referer: Some("https://blog.example.com/post".to_string()),
            properties: ContactProperties::new().with("firstName", "Ada"),
            origin: Url::parse("https://news.example.com").unwrap(),
        }
    }

    fn handler(directory: Arc<MockDirectory>, captcha: bool) -> SubscribeHandler {
        SubscribeHandler::new(directory, Arc::new(FixedCaptcha(captcha)), Arc::new(StaticTokens))
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Validation
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_email_is_bad_request() {
        let directory = Arc::new(MockDirectory::new());
        let err = handler(directory, true)
            .handle(command("  ", None))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing email");
    }

    #[tokio::test]
    async fn missing_captcha_token_is_bad_request() {
        let directory = Arc::new(MockDirectory::new());
        let mut cmd = command("a@example.com", None);
        cmd.captcha_token = String::new();

        let err = handler(directory.clone(), true).handle(cmd).await.unwrap_err();

        assert_eq!(err.to_string(), "Missing CAPTCHA token");
        assert!(directory.upserts().is_empty());
    }

    #[tokio::test]
    async fn failed_captcha_is_slow_down() {
        let directory = Arc::new(MockDirectory::new());

        let err = handler(directory.clone(), false)
            .handle(command("a@example.com", None))
            .await
            .unwrap_err();

        assert_eq!(err.reason(), Some("captcha-rejected"));
        assert!(directory.upserts().is_empty());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // New and pending contacts
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn new_contact_gets_confirmation_mail() {
        let directory = Arc::new(MockDirectory::new());

        let result = handler(directory.clone(), true)
            .handle(command("a@example.com", Some(vec!["l1"])))
            .await
            .unwrap();

        assert_eq!(
            result,
            SubscribeResult {
                email: "a@example.com".to_string(),
                double_opt_in: true
            }
        );
        let sent = directory.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "a@example.com");
        assert_eq!(
            sent[0].1,
            "https://news.example.com/control-panel?token=token-for-a%40example.com-at-news.example.com&lang=pl"
        );
        assert_eq!(sent[0].2.as_deref(), Some("pl"));
    }

    #[tokio::test]
    async fn properties_carry_language_and_referer_but_not_reserved_keys() {
        let directory = Arc::new(MockDirectory::new());
        let mut cmd = command("a@example.com", None);
        cmd.properties.insert(CUSTOM_OPT_IN_STATUS_PROPERTY, "accepted");

        handler(directory.clone(), true).handle(cmd).await.unwrap();

        let upserts = directory.upserts();
        let (_, properties, lists) = &upserts[0];
        assert_eq!(properties.get_str("language"), Some("pl"));
        assert_eq!(properties.get_str("referer"), Some("https://blog.example.com/post"));
        assert_eq!(properties.get_str("firstName"), Some("Ada"));
        assert!(properties.get(CUSTOM_OPT_IN_STATUS_PROPERTY).is_none());
        assert_eq!(lists, &Some(vec![]));
    }

    #[tokio::test]
    async fn pending_contact_is_mailed_again() {
        let directory = Arc::new(
            MockDirectory::new().with_contact(contact("a@example.com", Some(OptInStatus::Pending), &[])),
        );

        let result = handler(directory.clone(), true)
            .handle(command("a@example.com", None))
            .await
            .unwrap();

        assert!(result.double_opt_in);
        assert_eq!(directory.sent().len(), 1);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Settled contacts
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn rejected_contact_is_slow_down() {
        let directory = Arc::new(
            MockDirectory::new().with_contact(contact("a@example.com", Some(OptInStatus::Rejected), &[])),
        );

        let err = handler(directory.clone(), true)
            .handle(command("a@example.com", None))
            .await
            .unwrap_err();

        assert!(matches!(err, SubscriptionError::SlowDown { .. }));
        assert_eq!(err.reason(), Some("subscription-rejected"));
        assert!(directory.sent().is_empty());
    }

    #[tokio::test]
    async fn accepted_contact_on_all_lists_is_not_mailed() {
        let directory = Arc::new(MockDirectory::new().with_contact(contact(
            "a@example.com",
            Some(OptInStatus::Accepted),
            &["l1", "l2"],
        )));
        let handler = handler(directory.clone(), true);

        for _ in 0..2 {
            let result = handler
                .handle(command("a@example.com", Some(vec!["l1", "l2"])))
                .await
                .unwrap();
            assert!(!result.double_opt_in);
        }

        assert!(directory.sent().is_empty());
    }

    #[tokio::test]
    async fn accepted_contact_missing_a_list_is_mailed() {
        let directory = Arc::new(MockDirectory::new().with_contact(contact(
            "a@example.com",
            Some(OptInStatus::Accepted),
            &["l1"],
        )));

        let result = handler(directory.clone(), true)
            .handle(command("a@example.com", Some(vec!["l1", "l2"])))
            .await
            .unwrap();

        assert!(result.double_opt_in);
        assert_eq!(directory.sent().len(), 1);
    }

    #[test]
    fn control_panel_url_without_language() {
        let origin = Url::parse("http://localhost:8888").unwrap();
        let url = control_panel_url(&origin, "abc.def", None).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8888/control-panel?token=abc.def");
    }
}
