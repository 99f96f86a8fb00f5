//! Subscription domain - contacts, mailing lists and the opt-in state.
//!
//! # Module Organization
//!
//! - `contact` - The subscriber record and membership helpers
//! - `opt_in` - Opt-in status and built-in/custom reconciliation
//! - `properties` - Free-form scalar contact properties
//! - `mailing_list` - Mailing lists and per-contact membership views
//! - `transactional` - E-mail templates and confirmation template selection
//! - `company` - Company identity used in e-mails and the widget
//! - `errors` - Error taxonomy shared by every subscription operation

mod company;
mod contact;
mod errors;
mod mailing_list;
mod opt_in;
mod properties;
mod transactional;

pub use company::CompanyIdentity;
pub use contact::{Contact, MailingListMembership};
pub use errors::{
    SubscriptionError, REASON_BAD_CAPTCHA, REASON_CAPTCHA_ACTION_MISMATCH,
    REASON_CAPTCHA_REJECTED, REASON_CAPTCHA_TIMEOUT, REASON_CONFIGURATION,
    REASON_SUBSCRIPTION_REJECTED,
};
pub use mailing_list::{MailingList, MailingListSubscription};
pub use opt_in::{OptInStatus, CUSTOM_OPT_IN_STATUS_PROPERTY};
pub use properties::{ContactProperties, PropertyValue, LANGUAGE_PROPERTY, REFERER_PROPERTY};
pub use transactional::{select_double_opt_in, TransactionalEmail, OPT_IN_URL_VARIABLE};
