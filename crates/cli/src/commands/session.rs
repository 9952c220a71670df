//! Login, logout and whoami.
//!
//! The shell is an admin tool: a successful login by a non-admin is undone
//! straight away, the way the dashboard refused to open for shoppers.

use babyshop_client::ShopApi;
use babyshop_core::{Credentials, UserSnapshot};
use tracing::{info, warn};

use crate::error::CliError;

/// Sign in and keep the session only for admins.
///
/// # Errors
///
/// Returns `CliError::NotAdmin` for non-admin accounts, or the API error.
pub async fn login(api: &ShopApi, email: String, password: String) -> Result<UserSnapshot, CliError> {
    let user = api.login(&Credentials { email, password }).await?;
    if !user.is_admin() {
        warn!(user_id = %user.id, role = %user.role, "Refusing non-admin session");
        api.logout().await?;
        return Err(CliError::NotAdmin {
            email: user.email.into_inner(),
        });
    }
    info!(user_id = %user.id, "Admin session stored");
    Ok(user)
}

/// # Errors
///
/// Returns `CliError::Api` if the stored session cannot be removed.
pub async fn logout(api: &ShopApi) -> Result<serde_json::Value, CliError> {
    api.logout().await?;
    Ok(serde_json::json!({ "message": "Signed out" }))
}

/// The stored user, verified against `/auth/profile` unless `offline`.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a session, or the API error. A
/// rejected token clears the session before the error is returned.
pub async fn whoami(api: &ShopApi, offline: bool) -> Result<UserSnapshot, CliError> {
    if api.session().token().is_none() {
        return Err(CliError::NotSignedIn);
    }
    if offline {
        return api.current_user().ok_or(CliError::NotSignedIn);
    }
    Ok(api.profile().await?)
}
