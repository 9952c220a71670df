//! Backend endpoint calls.
//!
//! [`ShopApi`] wraps the transport with the unauthorized policy: every failed
//! call is passed through [`UnauthorizedPolicy::apply`] before being returned,
//! so a `401` from any endpoint signs the user out. Calls are split by area
//! across the submodules as `impl ShopApi` blocks.

mod addresses;
mod admin;
mod auth;
mod cart;
mod catalog;
mod orders;
mod wishlist;

pub use catalog::{CategoryQuery, ProductQuery};

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::cache::CatalogCache;
use crate::error::ApiError;
use crate::http::ApiClient;
use crate::navigation::{Navigator, UnauthorizedPolicy};
use crate::session::SessionStore;

/// Endpoint façade shared by the storefront server and the admin shell.
#[derive(Debug, Clone)]
pub struct ShopApi {
    client: ApiClient,
    policy: UnauthorizedPolicy,
    cache: Option<CatalogCache>,
}

impl ShopApi {
    /// Wrap `client`, sending rejected sessions to `sign_in_path`.
    #[must_use]
    pub fn new(client: ApiClient, navigator: Arc<dyn Navigator>, sign_in_path: &'static str) -> Self {
        let policy = UnauthorizedPolicy::new(client.session().clone(), navigator, sign_in_path);
        Self {
            client,
            policy,
            cache: None,
        }
    }

    /// Serve anonymous catalog reads from `cache`.
    #[must_use]
    pub fn with_cache(mut self, cache: CatalogCache) -> Self {
        self.cache = Some(cache);
        self
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Arc<dyn SessionStore> {
        self.client.session()
    }

    fn observe<T>(&self, result: Result<T, ApiError>) -> Result<T, ApiError> {
        if let Err(e) = &result {
            self.policy.apply(e);
        }
        result
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.observe(self.client.get(endpoint).await)
    }

    async fn post<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.observe(self.client.post(endpoint, body).await)
    }

    async fn put<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.observe(self.client.put(endpoint, body).await)
    }

    async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.observe(self.client.delete(endpoint).await)
    }

    async fn delete_with_body<T, B>(&self, endpoint: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.observe(self.client.delete_with_body(endpoint, body).await)
    }

    /// Catalog read, cached while no user token is attached.
    async fn cached_get<T: DeserializeOwned>(&self, endpoint: String) -> Result<T, ApiError> {
        let cache = match &self.cache {
            Some(cache) if self.session().token().is_none() => cache,
            _ => return self.get(&endpoint).await,
        };

        let decode = |value: serde_json::Value, endpoint: &str| {
            serde_json::from_value(value).map_err(|source| ApiError::Decode {
                endpoint: endpoint.to_string(),
                source,
            })
        };

        if let Some(value) = cache.get(&endpoint).await {
            debug!(endpoint = %endpoint, "Catalog cache hit");
            return decode(value, &endpoint);
        }

        let value: serde_json::Value = self.get(&endpoint).await?;
        let typed = decode(value.clone(), &endpoint)?;
        cache.insert(endpoint, value).await;
        Ok(typed)
    }

    fn invalidate_catalog(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_all();
        }
    }
}
