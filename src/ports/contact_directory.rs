//! Contact directory port.
//!
//! The directory owns contacts, mailing lists and transactional e-mail
//! templates. Implementations translate its storage model into the
//! subscription domain, which includes reconciling the opt-in status.

use async_trait::async_trait;

use crate::domain::subscription::{
    Contact, ContactProperties, MailingList, MailingListMembership,
    SubscriptionError, TransactionalEmail,
};

/// Contact directory operations used by the subscription handlers.
///
/// # Contract
///
/// Implementations must:
/// - Return `Ok(None)` from `find_contact` for unknown e-mails
/// - Report contacts with the reconciled opt-in status
/// - Only ever return public mailing lists
/// - Return `SubscriptionError::Upstream` for directory failures
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Looks up a contact by e-mail.
    async fn find_contact(&self, email: &str) -> Result<Option<Contact>, SubscriptionError>;

    /// Creates the contact as pending, or returns the existing one unchanged.
    ///
    /// `mailing_list_ids` of `None` (or empty) means every public list.
    async fn upsert_contact(
        &self,
        email: &str,
        properties: &ContactProperties,
        mailing_list_ids: Option<&[String]>,
    ) -> Result<Contact, SubscriptionError>;

    /// Marks the contact as accepted and applies the membership map.
    ///
    /// `None` leaves memberships unchanged.
    async fn subscribe_contact(
        &self,
        email: &str,
        mailing_lists: Option<&MailingListMembership>,
    ) -> Result<(), SubscriptionError>;

    /// Marks the contact as rejected. Memberships are left as they are.
    async fn unsubscribe_contact(&self, email: &str) -> Result<(), SubscriptionError>;

    /// Public mailing lists only.
    async fn mailing_lists(&self) -> Result<Vec<MailingList>, SubscriptionError>;

    /// Confirmation template for the language, drawn from the full catalog.
    async fn double_opt_in_email(
        &self,
        language: Option<&str>,
    ) -> Result<Option<TransactionalEmail>, SubscriptionError>;

    /// Sends the confirmation e-mail carrying `opt_in_url`.
    ///
    /// Fails with `SubscriptionError::Configuration` when no template can
    /// carry the link.
    async fn send_confirmation_mail(
        &self,
        email: &str,
        opt_in_url: &str,
        language: Option<&str>,
    ) -> Result<(), SubscriptionError>;

    /// Creates the custom properties the service depends on when missing.
    async fn initialize_custom_properties(&self) -> Result<(), SubscriptionError>;
}
