//! Errors returned by the transport and endpoint calls.
//!
//! The transport never reacts to an error itself; it only classifies it. The
//! reaction to a `401` is decided by [`crate::navigation::UnauthorizedPolicy`].

use babyshop_core::ValidationError;
use reqwest::StatusCode;
use thiserror::Error;

use crate::session::SessionStoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend rejected the bearer token.
    #[error("Unauthorized - {endpoint}")]
    Unauthorized {
        endpoint: String,
        message: Option<String>,
    },

    /// Any other non-2xx response.
    #[error("API error: {} {} - {endpoint}", .status.as_u16(), status_text(*.status))]
    Status {
        status: StatusCode,
        endpoint: String,
        message: Option<String>,
    },

    /// No response at all: DNS, connect or reset.
    #[error("Network error - {endpoint}: {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the client timeout and was cancelled.
    #[error("Request timed out - {endpoint}")]
    Timeout { endpoint: String },

    /// A 2xx response whose body did not match the expected shape.
    #[error("Unexpected response body - {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request body could not be encoded - {endpoint}: {source}")]
    Encode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HTTP client could not be built: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Invalid query parameters: {0}")]
    InvalidQuery(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The form failed validation and nothing was sent.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Session(#[from] SessionStoreError),
}

fn status_text(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown")
}

impl ApiError {
    /// HTTP status of the failed response, if one was received.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Connectivity faults that say nothing about the session.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Network { .. } | Self::Timeout { .. })
    }

    /// Text suitable for a toast or inline message.
    ///
    /// Prefers the backend's own `message` field.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message: Some(m), .. } | Self::Status { message: Some(m), .. } => {
                m.clone()
            }
            Self::Unauthorized { message: None, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Network { .. } | Self::Timeout { .. } => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        let err = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            endpoint: "/products/p9".to_string(),
            message: Some("Product not found".to_string()),
        };
        assert_eq!(err.to_string(), "API error: 404 Not Found - /products/p9");
        assert_eq!(err.user_message(), "Product not found");
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_classification() {
        let timeout = ApiError::Timeout {
            endpoint: "/auth/profile".to_string(),
        };
        assert!(timeout.is_transient());
        assert!(!timeout.is_unauthorized());
        assert_eq!(timeout.status(), None);

        let unauthorized = ApiError::Unauthorized {
            endpoint: "/cart".to_string(),
            message: None,
        };
        assert!(unauthorized.is_unauthorized());
        assert_eq!(unauthorized.status(), Some(StatusCode::UNAUTHORIZED));
    }
}
