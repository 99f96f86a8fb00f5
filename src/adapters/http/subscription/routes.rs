//! Axum router configuration for the subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_captcha, get_company, get_subscription, honeypot, list_mailing_lists, subscribe,
    update_subscription, SubscriptionAppState,
};

/// Create the subscription API router, meant to be nested under `/api`.
///
/// # Routes
///
/// ## Public
/// - `GET /company` - Company identity for the widget
/// - `GET /captcha` - CAPTCHA provider and site key
/// - `GET /lists` - Public mailing lists
/// - `POST /honeypot` - Bot trap
///
/// ## CAPTCHA-gated
/// - `POST /subscription` - Start the double opt-in
///
/// ## Magic link (Bearer token)
/// - `GET /subscription` - Subscriber state for the control panel
/// - `PUT /subscription` - Accept or reject
pub fn subscription_routes() -> Router<SubscriptionAppState> {
    Router::new()
        .route("/company", get(get_company))
        .route("/captcha", get(get_captcha))
        .route("/lists", get(list_mailing_lists))
        .route("/honeypot", post(honeypot))
        .route(
            "/subscription",
            post(subscribe).get(get_subscription).put(update_subscription),
        )
}
