//! Babyshop Storefront library.
//!
//! The server-rendered half of the storefront: route protection for account
//! pages, the checkout-session endpoint, and JSON views over the backend for
//! catalog and account pages. Exposed as a library so the router can be
//! exercised without binding a socket.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod cookies;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{Router, http::Request, routing::get};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full application: routes, guard and ambient middleware.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::session_guard_middleware,
        ))
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
