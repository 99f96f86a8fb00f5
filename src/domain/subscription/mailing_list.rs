//! Mailing lists and their per-contact membership view.

use serde::{Deserialize, Serialize};

use super::contact::Contact;

/// A directory mailing list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailingList {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Only public lists are ever exposed outside the service.
    pub is_public: bool,
}

/// A mailing list together with one contact's membership in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailingListSubscription {
    pub list: MailingList,
    pub subscribed: bool,
}

impl MailingListSubscription {
    /// Joins every given list with the contact's membership snapshot.
    ///
    /// Iterates the list side, so lists the contact has never seen show up
    /// as unsubscribed instead of being omitted.
    pub fn join(lists: Vec<MailingList>, contact: &Contact) -> Vec<Self> {
        lists
            .into_iter()
            .map(|list| {
                let subscribed = contact.is_member_of(&list.id);
                Self { list, subscribed }
            })
            .collect()
    }
}
