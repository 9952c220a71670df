//! Integration tests for Babyshop.
//!
//! Everything runs in-process: the backend and the payment provider are
//! `wiremock` servers, the storefront router is driven with
//! `tower::ServiceExt::oneshot`, and the admin shell's session lives in a
//! temporary file.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p babyshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `session_transport` - Bearer header, 401 sign-out, query strings
//! - `route_guard` - Protected routes, fail-open verification, post-payment bypass
//! - `checkout_flow` - Hosted checkout sessions end to end

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use babyshop_client::navigation::{ADMIN_LOGIN_PATH, RecordingNavigator};
use babyshop_client::{ApiClient, ApiConfig, FileSessionStore, SessionStore, ShopApi};
use babyshop_storefront::config::{StorefrontConfig, StripeConfig};
use babyshop_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;
use wiremock::MockServer;

/// Public URL the storefront believes it is served from.
pub const STOREFRONT_URL: &str = "http://localhost:3000";

/// Backend location for a mock server; the API lives under `/api`.
#[must_use]
pub fn api_config(backend: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: format!("{}/api", backend.uri()),
        is_production: false,
    }
}

/// Storefront configuration wired to the mock backend and provider.
#[must_use]
pub fn storefront_config(backend: &MockServer, stripe: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: STOREFRONT_URL.to_string(),
        api: api_config(backend),
        api_timeout: Duration::from_secs(5),
        stripe: StripeConfig {
            secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
            publishable_key: None,
            api_base: stripe.uri(),
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// The full storefront application with a custom verification budget.
#[must_use]
pub fn storefront(backend: &MockServer, stripe: &MockServer, verify_timeout: Duration) -> Router {
    let state =
        AppState::with_verify_timeout(storefront_config(backend, stripe), verify_timeout).unwrap();
    babyshop_storefront::app(state)
}

/// Admin API over a session file, with a navigator the test can inspect.
#[must_use]
pub fn admin_api(backend: &MockServer, session_file: &Path) -> (ShopApi, Arc<RecordingNavigator>) {
    admin_api_at(&api_config(backend), session_file)
}

/// Like [`admin_api`] for an arbitrary backend location.
#[must_use]
pub fn admin_api_at(config: &ApiConfig, session_file: &Path) -> (ShopApi, Arc<RecordingNavigator>) {
    let store: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(session_file));
    let navigator = Arc::new(RecordingNavigator::new());
    let client = ApiClient::admin(config, store).unwrap();
    (
        ShopApi::new(client, navigator.clone(), ADMIN_LOGIN_PATH),
        navigator,
    )
}

/// `GET uri`, optionally carrying the `auth_token` cookie.
#[must_use]
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("auth_token={token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// `POST uri` with a JSON body, optionally carrying the `auth_token` cookie.
#[must_use]
pub fn post_json(uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("cookie", format!("auth_token={token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Response status, headers and JSON body (`Value::Null` when not JSON).
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

/// Send one request through `app`.
pub async fn send(app: Router, request: Request<Body>) -> Reply {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    Reply {
        status,
        headers,
        body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
    }
}

/// Requests the mock received for `path`.
pub async fn requests_to(server: &MockServer, path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == path)
        .collect()
}
