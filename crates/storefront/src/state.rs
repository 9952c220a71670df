//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use babyshop_client::checkout::{CheckoutService, StripeCheckout};
use babyshop_client::guard::{ProfileVerifier, VERIFY_TIMEOUT};
use babyshop_client::navigation::{RecordingNavigator, SIGN_IN_PATH};
use babyshop_client::{
    ApiClient, ApiError, CatalogCache, MemorySessionStore, SessionGuard, SessionStore, ShopApi,
};

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    http: reqwest::Client,
    catalog: ShopApi,
    guard: SessionGuard<ProfileVerifier>,
    checkout: CheckoutService<StripeCheckout>,
}

/// Backend access for one request, authenticated with the request's cookie.
///
/// The navigator records where the unauthorized policy sent the user, which
/// the handler turns into an HTTP redirect.
pub struct RequestApi {
    pub api: ShopApi,
    pub navigator: Arc<RecordingNavigator>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if an HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        Self::with_verify_timeout(config, VERIFY_TIMEOUT)
    }

    /// Like [`AppState::new`] with a custom budget for the guard's profile call.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Build` if an HTTP client cannot be built.
    pub fn with_verify_timeout(
        config: StorefrontConfig,
        verify_timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.api_timeout)
            .build()
            .map_err(ApiError::Build)?;

        let anonymous: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
        let catalog = ShopApi::new(
            ApiClient::with_http(http.clone(), &config.api.base_url, anonymous),
            Arc::new(RecordingNavigator::new()),
            SIGN_IN_PATH,
        )
        .with_cache(CatalogCache::default());

        let guard = SessionGuard::new(ProfileVerifier::with_timeout(
            &config.api.base_url,
            verify_timeout,
        )?);
        let checkout = CheckoutService::new(StripeCheckout::new(
            http.clone(),
            &config.stripe.api_base,
            config.stripe.secret_key.clone(),
        ));

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                http,
                catalog,
                guard,
                checkout,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Anonymous backend access with the 100 s catalog cache.
    #[must_use]
    pub fn catalog(&self) -> &ShopApi {
        &self.inner.catalog
    }

    #[must_use]
    pub fn guard(&self) -> &SessionGuard<ProfileVerifier> {
        &self.inner.guard
    }

    #[must_use]
    pub fn checkout(&self) -> &CheckoutService<StripeCheckout> {
        &self.inner.checkout
    }

    /// Backend access seeded with `token`; shares the connection pool.
    #[must_use]
    pub fn api_for(&self, token: Option<String>) -> RequestApi {
        let store = token.map_or_else(MemorySessionStore::new, MemorySessionStore::from_token);
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::with_http(
            self.inner.http.clone(),
            &self.inner.config.api.base_url,
            Arc::new(store),
        );
        RequestApi {
            api: ShopApi::new(client, navigator.clone(), SIGN_IN_PATH),
            navigator,
        }
    }
}
