//! Subscription command and query handlers.

mod get_subscription;
mod subscribe;
mod update_subscription;

pub use get_subscription::{GetSubscriptionHandler, GetSubscriptionQuery, SubscriptionView};
pub use subscribe::{
    control_panel_url, SubscribeCommand, SubscribeHandler, SubscribeResult, CONTROL_PANEL_PATH,
};
pub use update_subscription::{
    UpdateSubscriptionCommand, UpdateSubscriptionHandler, UpdateSubscriptionResult,
};
