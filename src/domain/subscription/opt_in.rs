//! Double opt-in status and its reconciliation rules.
//!
//! The directory keeps a built-in opt-in status that its own double opt-in
//! flow manages. This service keeps a custom shadow status (`xOptInStatus`)
//! that it writes itself. The two are merged into a single effective status
//! whenever a contact is read:
//!
//! | custom    | built-in  | effective |
//! |-----------|-----------|-----------|
//! | settled   | any       | custom    |
//! | unsettled | settled   | built-in  |
//! | unsettled | unsettled | custom    |
//!
//! "Settled" means accepted or rejected. Once the directory has resolved a
//! contact on its own, this service must not contradict it by re-sending a
//! confirmation e-mail, even if the custom field has not caught up yet.

use serde::{Deserialize, Serialize};

/// Directory property key holding the custom opt-in status.
pub const CUSTOM_OPT_IN_STATUS_PROPERTY: &str = "xOptInStatus";

/// Opt-in status of a contact. `None` stands for "never set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptInStatus {
    Pending,
    Accepted,
    Rejected,
}

impl OptInStatus {
    /// Returns true for accepted or rejected.
    pub fn is_settled(self) -> bool {
        matches!(self, OptInStatus::Accepted | OptInStatus::Rejected)
    }

    /// Wire representation used in directory properties.
    pub fn as_str(self) -> &'static str {
        match self {
            OptInStatus::Pending => "pending",
            OptInStatus::Accepted => "accepted",
            OptInStatus::Rejected => "rejected",
        }
    }

    /// Parses a directory value leniently; unknown values read as unset.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(OptInStatus::Pending),
            "accepted" => Some(OptInStatus::Accepted),
            "rejected" => Some(OptInStatus::Rejected),
            _ => None,
        }
    }

    /// Merges the custom and built-in statuses into the effective one.
    pub fn reconcile(custom: Option<Self>, built_in: Option<Self>) -> Option<Self> {
        if custom.is_some_and(Self::is_settled) {
            custom
        } else if built_in.is_some_and(Self::is_settled) {
            built_in
        } else {
            custom
        }
    }
}

impl std::fmt::Display for OptInStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
