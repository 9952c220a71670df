//! Route protection for server-rendered pages.
//!
//! Before a guarded page renders, the `auth_token` cookie is checked against
//! the backend profile endpoint. Account pages need a verified session, the
//! sign-in pages bounce users who already have one, and the post-payment
//! landing page trusts the cookie without asking the backend so that the
//! return from the payment provider is never interrupted.
//!
//! Verification fails open: if the backend cannot be reached in time the
//! session is treated as valid.

use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, info, instrument, warn};

use crate::endpoints;
use crate::error::ApiError;
use crate::navigation::{PROFILE_PATH, SIGN_IN_PATH};

/// Cookie carrying the bearer token in server-rendered flows.
pub const AUTH_COOKIE: &str = "auth_token";

/// Budget for the verification call.
pub const VERIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Post-payment landing page.
pub const SUCCESS_PATH: &str = "/success";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unauthenticated,
    Verifying,
    Authenticated,
}

impl GuardState {
    /// State when a guarded route is requested.
    #[must_use]
    pub const fn on_request(token_present: bool) -> Self {
        if token_present {
            Self::Verifying
        } else {
            Self::Unauthenticated
        }
    }

    /// State once the verification call settles.
    #[must_use]
    pub const fn on_verification(self, verification: Verification) -> Self {
        match (self, verification) {
            (Self::Verifying, Verification::Accepted | Verification::Unreachable) => {
                Self::Authenticated
            }
            (Self::Verifying, Verification::Rejected { .. }) => Self::Unauthenticated,
            (state, _) => state,
        }
    }
}

/// How the guard treats a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// `/user` and below: needs a verified session.
    Protected,
    /// `/auth` and below: only for signed-out users.
    AuthPage,
    /// `/success`: cookie presence is enough.
    PostPayment,
    /// Everything else is not guarded.
    Public,
}

impl RouteClass {
    #[must_use]
    pub fn of(path: &str) -> Self {
        let under = |prefix: &str| {
            path.strip_prefix(prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        };

        if path == SUCCESS_PATH {
            Self::PostPayment
        } else if under("/user") {
            Self::Protected
        } else if under("/auth") {
            Self::AuthPage
        } else {
            Self::Public
        }
    }
}

/// Result of asking the backend about a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verification {
    /// 2xx from the profile endpoint.
    Accepted,
    /// Any other status.
    Rejected { status: StatusCode },
    /// Timeout or no response.
    Unreachable,
}

/// Checks a bearer token.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> impl Future<Output = Verification> + Send;
}

/// Verifies tokens with `GET /auth/profile`.
#[derive(Debug, Clone)]
pub struct ProfileVerifier {
    http: reqwest::Client,
    profile_url: String,
}

impl ProfileVerifier {
    /// Verifier with the standard 5 s budget.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, VERIFY_TIMEOUT)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Build` if the HTTP client fails to build.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Build)?;
        Ok(Self {
            http,
            profile_url: format!("{}{}", base_url.trim_end_matches('/'), endpoints::PROFILE),
        })
    }
}

impl TokenVerifier for ProfileVerifier {
    async fn verify(&self, token: &str) -> Verification {
        let result = self
            .http
            .get(&self.profile_url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => Verification::Accepted,
            Ok(response) => {
                debug!(status = response.status().as_u16(), "Profile verification rejected");
                Verification::Rejected {
                    status: response.status(),
                }
            }
            Err(e) => {
                warn!(
                    error = %e,
                    timeout = e.is_timeout(),
                    "Token verification unreachable, allowing access with existing token"
                );
                Verification::Unreachable
            }
        }
    }
}

/// What to do with the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

/// Outcome of one guard evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardOutcome {
    /// Final state; `None` on unguarded paths.
    pub state: Option<GuardState>,
    pub decision: GuardDecision,
    /// Whether a verification call was issued.
    pub verified: bool,
}

/// The route guard.
#[derive(Debug, Clone)]
pub struct SessionGuard<V> {
    verifier: V,
}

impl<V: TokenVerifier> SessionGuard<V> {
    pub const fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Decide what happens to a request for `path` carrying `token`.
    ///
    /// An empty token counts as absent.
    #[instrument(skip(self, token), fields(token_present = token.is_some_and(|t| !t.is_empty())))]
    pub async fn evaluate(&self, path: &str, token: Option<&str>) -> GuardOutcome {
        let token = token.filter(|t| !t.is_empty());
        let class = RouteClass::of(path);

        match class {
            RouteClass::Public => {
                return GuardOutcome {
                    state: None,
                    decision: GuardDecision::Allow,
                    verified: false,
                };
            }
            RouteClass::PostPayment => {
                let outcome = if token.is_some() {
                    GuardOutcome {
                        state: Some(GuardState::Authenticated),
                        decision: GuardDecision::Allow,
                        verified: false,
                    }
                } else {
                    GuardOutcome {
                        state: Some(GuardState::Unauthenticated),
                        decision: GuardDecision::Redirect(SIGN_IN_PATH),
                        verified: false,
                    }
                };
                debug!(decision = ?outcome.decision, "Post-payment landing, verification bypassed");
                return outcome;
            }
            RouteClass::Protected | RouteClass::AuthPage => {}
        }

        let mut state = GuardState::on_request(token.is_some());
        let mut verified = false;
        if let Some(token) = token {
            let verification = self.verifier.verify(token).await;
            verified = true;
            state = state.on_verification(verification);
            debug!(?verification, ?state, "Token verification settled");
        }

        let decision = match (class, state) {
            (RouteClass::Protected, GuardState::Authenticated)
            | (RouteClass::AuthPage, GuardState::Unauthenticated | GuardState::Verifying)
            | (RouteClass::Protected, GuardState::Verifying) => GuardDecision::Allow,
            (RouteClass::Protected, GuardState::Unauthenticated) => {
                info!("Redirecting unauthenticated user to sign-in");
                GuardDecision::Redirect(SIGN_IN_PATH)
            }
            (RouteClass::AuthPage, GuardState::Authenticated) => {
                info!("Redirecting authenticated user to profile");
                GuardDecision::Redirect(PROFILE_PATH)
            }
            (RouteClass::PostPayment | RouteClass::Public, _) => GuardDecision::Allow,
        };

        GuardOutcome {
            state: Some(state),
            decision,
            verified,
        }
    }
}
