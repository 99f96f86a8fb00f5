//! HTTP handlers for the subscription endpoints.
//!
//! These handlers connect axum routes to the subscription command/query
//! handlers of the application layer.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, Json, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use reqwest::Url;

use crate::adapters::http::middleware::{AuthState, RequireAuth};
use crate::adapters::http::ApiError;
use crate::application::handlers::subscription::{
    GetSubscriptionHandler, GetSubscriptionQuery, SubscribeCommand, SubscribeHandler,
    UpdateSubscriptionCommand, UpdateSubscriptionHandler,
};
use crate::config::CaptchaProvider;
use crate::domain::subscription::{CompanyIdentity, SubscriptionError};
use crate::ports::{CaptchaVerifier, ContactDirectory, TokenService};

use super::dto::{
    CaptchaResponse, CompanyResponse, HoneypotResponse, MailingListResponse, SubscribeRequest,
    SubscribeResponse, SubscriptionResponse, UpdateSubscriptionRequest, UpdateSubscriptionResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the subscription endpoints.
#[derive(Clone)]
pub struct SubscriptionAppState {
    pub directory: Arc<dyn ContactDirectory>,
    pub captcha: Arc<dyn CaptchaVerifier>,
    pub tokens: Arc<dyn TokenService>,
    pub company: CompanyIdentity,
    pub captcha_provider: CaptchaProvider,
    /// Empty when no site key is configured.
    pub captcha_site_key: String,
    /// Configured public origin; magic links point here.
    pub public_url: Url,
}

impl SubscriptionAppState {
    /// Host tokens are issued for and validated against.
    pub fn issuer_host(&self) -> String {
        self.public_url.host_str().unwrap_or_default().to_string()
    }

    pub fn subscribe_handler(&self) -> SubscribeHandler {
        SubscribeHandler::new(
            self.directory.clone(),
            self.captcha.clone(),
            self.tokens.clone(),
        )
    }

    pub fn get_subscription_handler(&self) -> GetSubscriptionHandler {
        GetSubscriptionHandler::new(self.directory.clone())
    }

    pub fn update_subscription_handler(&self) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(self.directory.clone())
    }
}

impl FromRef<SubscriptionAppState> for AuthState {
    fn from_ref(state: &SubscriptionAppState) -> Self {
        AuthState {
            tokens: state.tokens.clone(),
            issuer_host: state.issuer_host(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Public endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/company
pub async fn get_company(State(state): State<SubscriptionAppState>) -> impl IntoResponse {
    Json(CompanyResponse::from(&state.company))
}

/// GET /api/captcha
pub async fn get_captcha(State(state): State<SubscriptionAppState>) -> impl IntoResponse {
    Json(CaptchaResponse {
        success: true,
        provider: state.captcha_provider.as_str(),
        site_key: state.captcha_site_key.clone(),
    })
}

/// GET /api/lists - public mailing lists only
pub async fn list_mailing_lists(
    State(state): State<SubscriptionAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let lists = state.directory.mailing_lists().await?;
    let response: Vec<MailingListResponse> = lists.into_iter().map(Into::into).collect();
    Ok(Json(response))
}

/// POST /api/subscription
pub async fn subscribe(
    State(state): State<SubscriptionAppState>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| SubscriptionError::malformed(rejection.body_text()))?;

    let cmd = SubscribeCommand {
        properties: request.contact_properties(),
        email: request.email.unwrap_or_default(),
        captcha_token: request.captcha_token.unwrap_or_default(),
        mailing_lists: request.mailing_lists,
        language: request.language,
        referer: request.referer,
        origin: state.public_url.clone(),
    };

    let result = state.subscribe_handler().handle(cmd).await?;
    Ok(Json(SubscribeResponse::from(result)))
}

/// POST /api/honeypot
///
/// Bait endpoint for form-filling bots. Always succeeds; the request is
/// logged for later inspection.
pub async fn honeypot(headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-");
    tracing::warn!(
        user_agent,
        body = %String::from_utf8_lossy(&body),
        "Honeypot triggered"
    );
    Json(HoneypotResponse { success: true })
}

// ════════════════════════════════════════════════════════════════════════════════
// Magic-link endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/subscription
pub async fn get_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAuth(subscriber): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetSubscriptionQuery {
        email: subscriber.email,
    };
    let view = state.get_subscription_handler().handle(query).await?;
    Ok(Json(SubscriptionResponse::from(view)))
}

/// PUT /api/subscription
pub async fn update_subscription(
    State(state): State<SubscriptionAppState>,
    RequireAuth(subscriber): RequireAuth,
    payload: Result<Json<UpdateSubscriptionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload.map_err(|rejection| SubscriptionError::malformed(rejection.body_text()))?;

    let cmd = UpdateSubscriptionCommand {
        subscriber,
        email: request.email,
        subscribe: request.subscribe,
        mailing_lists: request.mailing_lists,
    };

    let result = state.update_subscription_handler().handle(cmd).await?;
    Ok(Json(UpdateSubscriptionResponse::from(result)))
}
