//! Backend base URL resolution.
//!
//! Each frontend reads its API location from a different set of environment
//! variables, and the storefront distinguishes server-rendered requests from
//! browser requests. The admin dashboard refuses to start without a URL; the
//! storefront falls back to a local backend.

use std::env;

use thiserror::Error;
use url::Url;

/// Fallback used by the storefront when no URL is configured.
pub const LOCAL_API_URL: &str = "http://localhost:8000/api";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which frontend is talking to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frontend {
    Admin,
    Storefront,
}

/// Where the request originates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Browser,
    Server,
}

/// Resolved backend location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub is_production: bool,
}

impl ApiConfig {
    /// Resolve from the process environment, loading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or the URL is
    /// malformed.
    pub fn resolve(frontend: Frontend, context: ExecutionContext) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::resolve_with(frontend, context, |key| env::var(key).ok())
    }

    /// Resolve through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when the admin URL is absent and
    /// `ConfigError::InvalidEnvVar` when a URL does not parse.
    pub fn resolve_with<F>(
        frontend: Frontend,
        context: ExecutionContext,
        lookup: F,
    ) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let is_set_to_production =
            |keys: &[&str]| keys.iter().any(|k| get(k).as_deref() == Some("production"));

        let config = match frontend {
            Frontend::Admin => {
                let raw = get("ADMIN_API_URL")
                    .ok_or_else(|| ConfigError::MissingEnvVar("ADMIN_API_URL".to_string()))?;
                Self {
                    base_url: format!("{}/api", raw.trim_end_matches('/')),
                    is_production: is_set_to_production(&["ADMIN_APP_ENV", "APP_ENV"]),
                }
            }
            Frontend::Storefront => {
                let key = match context {
                    ExecutionContext::Browser => "STOREFRONT_PUBLIC_API_URL",
                    ExecutionContext::Server => "STOREFRONT_API_ENDPOINT",
                };
                Self {
                    base_url: get(key).unwrap_or_else(|| LOCAL_API_URL.to_string()),
                    is_production: is_set_to_production(&["APP_ENV", "STOREFRONT_PUBLIC_APP_ENV"]),
                }
            }
        };

        Url::parse(&config.base_url).map_err(|e| {
            let key = match (frontend, context) {
                (Frontend::Admin, _) => "ADMIN_API_URL",
                (Frontend::Storefront, ExecutionContext::Browser) => "STOREFRONT_PUBLIC_API_URL",
                (Frontend::Storefront, ExecutionContext::Server) => "STOREFRONT_API_ENDPOINT",
            };
            ConfigError::InvalidEnvVar(key.to_string(), e.to_string())
        })?;

        Ok(config)
    }
}
