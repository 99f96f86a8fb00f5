//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod subscription;

pub use subscription::{
    GetSubscriptionHandler, GetSubscriptionQuery, SubscribeCommand, SubscribeHandler,
    SubscribeResult, SubscriptionView, UpdateSubscriptionCommand, UpdateSubscriptionHandler,
    UpdateSubscriptionResult,
};
