//! GetSubscriptionHandler - Query for the control panel view.

use std::sync::Arc;

use crate::domain::subscription::{MailingListSubscription, OptInStatus, SubscriptionError};
use crate::ports::ContactDirectory;

/// Query for one subscriber's state.
#[derive(Debug, Clone)]
pub struct GetSubscriptionQuery {
    pub email: String,
}

/// A subscriber's state joined with every public mailing list.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionView {
    pub email: String,
    pub subscribed: bool,
    pub opt_in_status: Option<OptInStatus>,
    pub referer: Option<String>,
    pub mailing_lists: Vec<MailingListSubscription>,
}

pub struct GetSubscriptionHandler {
    directory: Arc<dyn ContactDirectory>,
}

impl GetSubscriptionHandler {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(&self, query: GetSubscriptionQuery) -> Result<SubscriptionView, SubscriptionError> {
        let contact = self
            .directory
            .find_contact(&query.email)
            .await?
            .ok_or_else(|| SubscriptionError::contact_not_found(&query.email))?;

        let lists = self.directory.mailing_lists().await?;
        let mailing_lists = MailingListSubscription::join(lists, &contact);

        Ok(SubscriptionView {
            email: contact.email,
            subscribed: contact.subscribed,
            opt_in_status: contact.opt_in_status,
            referer: contact.referer,
            mailing_lists,
        })
    }
}
