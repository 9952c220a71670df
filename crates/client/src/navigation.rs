//! What to do when the backend rejects the session.
//!
//! The transport only reports `401`; this module turns that report into the
//! two side effects the frontends expect: forget the stored session and send
//! the user to the sign-in page. Connectivity failures never sign anyone out.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};

use crate::error::ApiError;
use crate::session::SessionStore;

/// Storefront sign-in page.
pub const SIGN_IN_PATH: &str = "/auth/signin";

/// Admin dashboard login page.
pub const ADMIN_LOGIN_PATH: &str = "/login";

/// Storefront account page, the destination after a successful sign-in.
pub const PROFILE_PATH: &str = "/user/profile";

/// Client-side navigation.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Navigator that remembers where it was sent.
///
/// The storefront server uses it per request to turn a sign-out into an HTTP
/// redirect; tests use it to observe navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent destination.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    #[must_use]
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());
    }
}

/// What the policy did with an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// Session cleared and navigation to sign-in issued.
    SignedOut,
    /// Transient failure; the session was kept.
    KeptSession,
    /// Any other error; nothing was done.
    Propagated,
}

/// Reaction to `401` responses.
#[derive(Clone)]
pub struct UnauthorizedPolicy {
    session: Arc<dyn SessionStore>,
    navigator: Arc<dyn Navigator>,
    sign_in_path: &'static str,
}

impl std::fmt::Debug for UnauthorizedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnauthorizedPolicy")
            .field("sign_in_path", &self.sign_in_path)
            .finish_non_exhaustive()
    }
}

impl UnauthorizedPolicy {
    #[must_use]
    pub fn new(
        session: Arc<dyn SessionStore>,
        navigator: Arc<dyn Navigator>,
        sign_in_path: &'static str,
    ) -> Self {
        Self {
            session,
            navigator,
            sign_in_path,
        }
    }

    #[must_use]
    pub const fn sign_in_path(&self) -> &'static str {
        self.sign_in_path
    }

    /// Apply the policy to a failed call.
    pub fn apply(&self, error: &ApiError) -> PolicyOutcome {
        if error.is_unauthorized() {
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "Failed to clear session after 401");
            }
            info!(to = self.sign_in_path, "Session rejected, redirecting to sign-in");
            self.navigator.navigate(self.sign_in_path);
            return PolicyOutcome::SignedOut;
        }

        if error.is_transient() {
            warn!(error = %error, "Transient failure, keeping session");
            return PolicyOutcome::KeptSession;
        }

        PolicyOutcome::Propagated
    }
}
