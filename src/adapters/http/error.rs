//! API error type that converts subscription errors to HTTP responses.
//!
//! Every failure renders as `{"success": false, "error": .., "reason": ..}`.
//! Diagnostic details are logged and never returned to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::AuthError;
use crate::domain::subscription::SubscriptionError;

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
}

#[derive(Debug)]
pub struct ApiError(pub SubscriptionError);

impl From<SubscriptionError> for ApiError {
    fn from(err: SubscriptionError) -> Self {
        Self(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(SubscriptionError::from(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            SubscriptionError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            SubscriptionError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            SubscriptionError::Forbidden { .. } => StatusCode::FORBIDDEN,
            SubscriptionError::ContactNotFound { .. } => StatusCode::NOT_FOUND,
            SubscriptionError::SlowDown { .. } => StatusCode::TOO_MANY_REQUESTS,
            SubscriptionError::Configuration { .. } | SubscriptionError::Upstream { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let reason = self.0.reason();
        let details = self.0.details().unwrap_or_default();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), reason, details = %details, "{}", self.0);
        } else {
            tracing::warn!(status = status.as_u16(), reason, details = %details, "{}", self.0);
        }

        let body = ErrorResponse {
            success: false,
            error: self.0.to_string(),
            reason,
        };
        (status, Json(body)).into_response()
    }
}
