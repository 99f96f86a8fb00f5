//! HTTP adapters - REST API for the subscription widget and control panel.
//!
//! `build_app` assembles the `/api` router with the cross-cutting tower
//! layers: request ids, tracing, CORS and a request timeout.

pub mod error;
pub mod middleware;
pub mod subscription;

use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use error::{ApiError, ErrorResponse};
pub use subscription::{subscription_routes, SubscriptionAppState};

/// The API router with state applied, without cross-cutting layers.
pub fn api_router(state: SubscriptionAppState) -> Router {
    Router::new()
        .nest("/api", subscription_routes())
        .with_state(state)
}

/// The complete application: API routes plus tower-http layers.
pub fn build_app(state: SubscriptionAppState, config: &ServerConfig) -> Router {
    api_router(state).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(cors_layer(&config.cors_origins_list()))
            .layer(TimeoutLayer::new(config.request_timeout())),
    )
}

/// CORS for the widget. Without configured origins the request origin is
/// mirrored back.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, ACCEPT])
        .expose_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
