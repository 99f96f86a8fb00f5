//! Contact - one subscriber as seen through the directory.

use std::collections::BTreeMap;

use super::opt_in::OptInStatus;
use super::properties::ContactProperties;

/// Mailing list membership keyed by list id. Absent keys mean "not a member".
pub type MailingListMembership = BTreeMap<String, bool>;

/// A subscriber record in the contact directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    /// Directory-assigned identifier; immutable once set.
    pub id: String,
    pub email: String,
    /// Directory-managed "is receiving mail" flag.
    pub subscribed: bool,
    pub mailing_lists: MailingListMembership,
    /// Effective status after reconciliation.
    pub opt_in_status: Option<OptInStatus>,
    /// Last page that initiated a subscription, for redirect-back.
    pub referer: Option<String>,
    /// Remaining directory properties.
    pub properties: ContactProperties,
}

impl Contact {
    pub fn is_member_of(&self, mailing_list_id: &str) -> bool {
        self.mailing_lists
            .get(mailing_list_id)
            .copied()
            .unwrap_or(false)
    }

    /// True when the contact already belongs to every listed mailing list.
    /// Vacuously true for an empty request.
    pub fn is_member_of_all<'a>(&self, mailing_list_ids: impl IntoIterator<Item = &'a String>) -> bool {
        mailing_list_ids
            .into_iter()
            .all(|id| self.is_member_of(id))
    }

    pub fn is_rejected(&self) -> bool {
        self.opt_in_status == Some(OptInStatus::Rejected)
    }

    pub fn is_accepted(&self) -> bool {
        self.opt_in_status == Some(OptInStatus::Accepted)
    }
}
