//! UpdateSubscriptionHandler - Accept or reject from the control panel.

use std::sync::Arc;

use crate::domain::foundation::AuthenticatedSubscriber;
use crate::domain::subscription::{MailingListMembership, SubscriptionError};
use crate::ports::ContactDirectory;

/// Command to accept (`subscribe = true`) or reject the subscription.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub subscriber: AuthenticatedSubscriber,
    pub email: String,
    pub subscribe: bool,
    /// Membership changes; only applied when subscribing.
    pub mailing_lists: Option<MailingListMembership>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSubscriptionResult {
    pub email: String,
    pub subscribed: bool,
}

pub struct UpdateSubscriptionHandler {
    directory: Arc<dyn ContactDirectory>,
}

impl UpdateSubscriptionHandler {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }

    pub async fn handle(
        &self,
        cmd: UpdateSubscriptionCommand,
    ) -> Result<UpdateSubscriptionResult, SubscriptionError> {
        if !cmd.subscriber.owns(&cmd.email) {
            return Err(SubscriptionError::forbidden(format!(
                "Token subject {} does not match {}",
                cmd.subscriber.email, cmd.email
            )));
        }

        if cmd.subscribe {
            self.directory
                .subscribe_contact(&cmd.email, cmd.mailing_lists.as_ref())
                .await?;
        } else {
            if cmd.mailing_lists.is_some() {
                tracing::debug!("Ignoring mailing lists on unsubscribe");
            }
            self.directory.unsubscribe_contact(&cmd.email).await?;
        }

        Ok(UpdateSubscriptionResult {
            email: cmd.email,
            subscribed: cmd.subscribe,
        })
    }
}
