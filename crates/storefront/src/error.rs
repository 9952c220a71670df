//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. Route handlers return `Result<T, AppError>`;
//! bodies are JSON `{ "error": "..." }`.

use axum::{
    Json,
    http::{StatusCode, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};
use babyshop_client::ApiError;
use babyshop_client::checkout::{CREATION_FAILED, CheckoutError};
use serde_json::json;
use thiserror::Error;

use crate::cookies;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Checkout session could not be created.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// The backend rejected the session; the user is sent to `redirect`.
    #[error("Signed out, redirecting to {redirect}")]
    SignedOut { redirect: String },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Api(err) => match err {
                ApiError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
                ApiError::Status { status, .. } if status.is_client_error() => {
                    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_REQUEST)
                }
                ApiError::Status { .. } | ApiError::Decode { .. } => StatusCode::BAD_GATEWAY,
                ApiError::Network { .. } | ApiError::Timeout { .. } => {
                    StatusCode::SERVICE_UNAVAILABLE
                }
                ApiError::Validation(_) | ApiError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Checkout(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SignedOut { .. } => StatusCode::TEMPORARY_REDIRECT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Message safe to show to the shopper.
    fn public_message(&self) -> String {
        match self {
            Self::Api(err) => match err {
                ApiError::Unauthorized { .. }
                | ApiError::Network { .. }
                | ApiError::Timeout { .. }
                | ApiError::Validation(_)
                | ApiError::InvalidQuery(_) => err.user_message(),
                ApiError::Status { status, .. } if status.is_client_error() => err.user_message(),
                ApiError::Status { .. } | ApiError::Decode { .. } => {
                    "External service error".to_string()
                }
                _ => "Internal server error".to_string(),
            },
            Self::Checkout(_) => CREATION_FAILED.to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Self::SignedOut { redirect } = &self {
            return (
                [(SET_COOKIE, cookies::expired_session_cookie())],
                Redirect::temporary(redirect),
            )
                .into_response();
        }

        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (status, Json(json!({ "error": self.public_message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after the backend confirmed who is signed in.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context on sign-out.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
