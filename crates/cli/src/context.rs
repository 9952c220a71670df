//! Shell context: where the session lives and how the API is reached.
//!
//! The shell persists its session to a JSON file so that consecutive
//! invocations share one login, like the dashboard did with browser storage.

use std::path::PathBuf;
use std::sync::Arc;

use babyshop_client::navigation::{ADMIN_LOGIN_PATH, Navigator};
use babyshop_client::{ApiClient, ApiConfig, FileSessionStore, ShopApi};

use crate::error::CliError;

/// Default session file, relative to `$HOME`.
pub const DEFAULT_SESSION_FILE: &str = ".config/babyshop/auth-storage.json";

/// Resolve the session file: explicit path, else `$HOME` default, else the
/// working directory.
#[must_use]
pub fn session_path(explicit: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(|| {
        home.map_or_else(
            || PathBuf::from("auth-storage.json"),
            |home| home.join(DEFAULT_SESSION_FILE),
        )
    })
}

/// A shell has no page to navigate to; tell the operator to log in again.
#[derive(Debug, Default)]
pub struct ShellNavigator;

impl Navigator for ShellNavigator {
    fn navigate(&self, path: &str) {
        if path == ADMIN_LOGIN_PATH {
            tracing::warn!("Session expired or revoked, run `babyshop login`");
        } else {
            tracing::info!(to = path, "Navigation requested");
        }
    }
}

/// Admin API over the file-backed session.
///
/// # Errors
///
/// Returns `CliError::Api` if the HTTP client cannot be built.
pub fn admin_api(config: &ApiConfig, session_file: PathBuf) -> Result<ShopApi, CliError> {
    let store = Arc::new(FileSessionStore::new(session_file));
    let client = ApiClient::admin(config, store)?;
    Ok(ShopApi::new(
        client,
        Arc::new(ShellNavigator),
        ADMIN_LOGIN_PATH,
    ))
}
