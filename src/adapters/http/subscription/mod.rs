//! Subscription HTTP module - widget and control panel endpoints.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{
    get_captcha, get_company, get_subscription, honeypot, list_mailing_lists, subscribe,
    update_subscription, SubscriptionAppState,
};
pub use routes::subscription_routes;
