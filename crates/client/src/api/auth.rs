use babyshop_core::{
    Acknowledgement, Credentials, LoginResponse, Registration, UserSnapshot, Validate,
};
use tracing::{info, instrument, warn};

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;
use crate::session::Session;

impl ShopApi {
    /// Sign in and persist the new session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` without contacting the backend if the
    /// form is invalid, or the backend's error otherwise.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<UserSnapshot, ApiError> {
        credentials.validate()?;
        let response: LoginResponse = self.post(endpoints::LOGIN, credentials).await?;
        self.session()
            .save(&Session::new(response.token, Some(response.user.clone())))?;
        info!(user_id = %response.user.id, "Signed in");
        Ok(response.user)
    }

    /// Create an account. The new user still has to sign in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, or the backend's
    /// error (e.g. the email is taken).
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<UserSnapshot, ApiError> {
        registration.validate()?;
        self.post(endpoints::REGISTER, registration).await
    }

    /// Sign out. The local session is destroyed even if the backend call fails.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the stored session cannot be cleared.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ApiError> {
        if let Err(e) = self
            .post::<Acknowledgement, _>(endpoints::LOGOUT, &serde_json::json!({}))
            .await
        {
            warn!(error = %e, "Logout call failed, clearing local session anyway");
        }
        self.session().clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Fetch the current user and refresh the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` (after signing out) if the token is rejected.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserSnapshot, ApiError> {
        let user: UserSnapshot = self.get(endpoints::PROFILE).await?;
        if let Some(mut session) = self.session().load() {
            session.user = Some(user.clone());
            self.session().save(&session)?;
        }
        Ok(user)
    }

    /// User snapshot stored with the session, without a network call.
    #[must_use]
    pub fn current_user(&self) -> Option<UserSnapshot> {
        self.session().load().and_then(|session| session.user)
    }
}
