//! Route guard middleware and the per-request backend extractor.
//!
//! The middleware runs [`SessionGuard::evaluate`](babyshop_client::SessionGuard::evaluate)
//! for every request and turns a redirect decision into a `307`. When the
//! backend explicitly rejected the cookie, the cookie is expired in the same
//! response.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use babyshop_client::{ApiError, GuardDecision, GuardState};
use tracing::debug;

use crate::cookies;
use crate::error::AppError;
use crate::state::{AppState, RequestApi};

pub async fn session_guard_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let token = cookies::auth_token(request.headers());
    let outcome = state
        .guard()
        .evaluate(request.uri().path(), token.as_deref())
        .await;

    match outcome.decision {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect(to) => {
            let rejected = outcome.verified && outcome.state == Some(GuardState::Unauthenticated);
            debug!(path = %request.uri().path(), to, rejected, "Guard redirect");
            if rejected {
                (
                    [(SET_COOKIE, cookies::expired_session_cookie())],
                    Redirect::temporary(to),
                )
                    .into_response()
            } else {
                Redirect::temporary(to).into_response()
            }
        }
    }
}

impl FromRequestParts<AppState> for RequestApi {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(state.api_for(cookies::auth_token(&parts.headers)))
    }
}

impl RequestApi {
    /// Map a call result, turning a sign-out by the unauthorized policy into a redirect.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SignedOut` if the policy navigated away, otherwise
    /// the call's error as `AppError::Api`.
    pub fn settle<T>(&self, result: Result<T, ApiError>) -> Result<T, AppError> {
        result.map_err(|e| match self.navigator.last() {
            Some(redirect) => AppError::SignedOut { redirect },
            None => AppError::Api(e),
        })
    }
}
