//! Sign-in, sign-up and sign-out.
//!
//! The backend issues the bearer token; the storefront only moves it into the
//! HTTP-only `auth_token` cookie on sign-in and expires it on sign-out.

use axum::{
    Form, Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use babyshop_client::navigation::{PROFILE_PATH, SIGN_IN_PATH};
use babyshop_core::{Credentials, Registration, Role};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;

use crate::cookies;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::state::{AppState, RequestApi};

/// Form description for `GET /auth/signin` and `GET /auth/signup`.
pub async fn signin_page() -> Json<serde_json::Value> {
    Json(json!({ "form": "signin", "action": "/auth/signin", "fields": ["email", "password"] }))
}

pub async fn signup_page() -> Json<serde_json::Value> {
    Json(json!({ "form": "signup", "action": "/auth/signup", "fields": ["name", "email", "password"] }))
}

#[instrument(skip(state, credentials), fields(user_id = tracing::field::Empty))]
pub async fn signin(
    State(state): State<AppState>,
    Form(credentials): Form<Credentials>,
) -> Result<Response> {
    let backend = state.api_for(None);
    let user = backend.api.login(&credentials).await?;
    tracing::Span::current().record("user_id", tracing::field::display(&user.id));
    let token = backend
        .api
        .session()
        .token()
        .ok_or_else(|| AppError::Internal("login did not store a token".to_string()))?;
    let cookie = cookies::session_cookie(token.expose_secret(), state.config().secure_cookies())
        .ok_or_else(|| AppError::Internal("token is not a valid cookie value".to_string()))?;

    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(([(SET_COOKIE, cookie)], Redirect::to(PROFILE_PATH)).into_response())
}

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Create a customer account, then send the shopper to sign in.
#[instrument(skip(state, form))]
pub async fn signup(State(state): State<AppState>, Form(form): Form<SignupForm>) -> Result<Redirect> {
    let registration = Registration {
        name: form.name,
        email: form.email,
        password: form.password,
        role: Role::User,
    };
    state.api_for(None).api.register(&registration).await?;
    Ok(Redirect::to(SIGN_IN_PATH))
}

/// Sign out at the backend and expire the cookie, whatever the backend says.
#[instrument(skip(backend))]
pub async fn signout(backend: RequestApi) -> Response {
    if let Err(e) = backend.api.logout().await {
        tracing::warn!(error = %e, "Sign-out did not complete cleanly");
    }
    clear_sentry_user();
    (
        [(SET_COOKIE, cookies::expired_session_cookie())],
        Redirect::to(SIGN_IN_PATH),
    )
        .into_response()
}
