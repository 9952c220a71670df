//! Catalog and user administration, used by the admin shell.
//!
//! Every mutation validates its form first and drops cached catalog reads
//! once the backend accepts it.

use babyshop_core::{
    Acknowledgement, Banner, BannerId, BannerInput, Brand, BrandId, BrandInput, Category,
    CategoryId, CategoryInput, DashboardStats, Product, ProductId, ProductInput, Registration,
    UserId, UserList, UserSnapshot, UserUpdate, Validate,
};
use tracing::{info, instrument};

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;

impl ShopApi {
    // =========================================================================
    // Products
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError::Validation` for an invalid form, `ApiError::Status`
    /// with `403` for non-admins, or any other backend error.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        input.validate()?;
        let product: Product = self.post(endpoints::PRODUCTS, input).await?;
        self.invalidate_catalog();
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        input.validate()?;
        let product = self.put(&endpoints::product(id.as_str()), input).await?;
        self.invalidate_catalog();
        Ok(product)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<Acknowledgement, ApiError> {
        let ack = self.delete(&endpoints::product(id.as_str())).await?;
        self.invalidate_catalog();
        Ok(ack)
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        input.validate()?;
        let category = self.post(endpoints::CATEGORIES, input).await?;
        self.invalidate_catalog();
        Ok(category)
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        input.validate()?;
        let category = self.put(&endpoints::category(id.as_str()), input).await?;
        self.invalidate_catalog();
        Ok(category)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<Acknowledgement, ApiError> {
        let ack = self.delete(&endpoints::category(id.as_str())).await?;
        self.invalidate_catalog();
        Ok(ack)
    }

    // =========================================================================
    // Brands
    // =========================================================================

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_brand(&self, input: &BrandInput) -> Result<Brand, ApiError> {
        input.validate()?;
        let brand = self.post(endpoints::BRANDS, input).await?;
        self.invalidate_catalog();
        Ok(brand)
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(brand_id = %id))]
    pub async fn update_brand(&self, id: &BrandId, input: &BrandInput) -> Result<Brand, ApiError> {
        input.validate()?;
        let brand = self.put(&endpoints::brand(id.as_str()), input).await?;
        self.invalidate_catalog();
        Ok(brand)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn delete_brand(&self, id: &BrandId) -> Result<Acknowledgement, ApiError> {
        let ack = self.delete(&endpoints::brand(id.as_str())).await?;
        self.invalidate_catalog();
        Ok(ack)
    }

    // =========================================================================
    // Banners
    // =========================================================================

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_banner(&self, input: &BannerInput) -> Result<Banner, ApiError> {
        input.validate()?;
        let banner = self.post(endpoints::BANNERS, input).await?;
        self.invalidate_catalog();
        Ok(banner)
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(banner_id = %id))]
    pub async fn update_banner(
        &self,
        id: &BannerId,
        input: &BannerInput,
    ) -> Result<Banner, ApiError> {
        input.validate()?;
        let banner = self.put(&endpoints::banner(id.as_str()), input).await?;
        self.invalidate_catalog();
        Ok(banner)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn delete_banner(&self, id: &BannerId) -> Result<Acknowledgement, ApiError> {
        let ack = self.delete(&endpoints::banner(id.as_str())).await?;
        self.invalidate_catalog();
        Ok(ack)
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn users(&self) -> Result<Vec<UserSnapshot>, ApiError> {
        let list: UserList = self.get(endpoints::USERS).await?;
        Ok(list.users)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user(&self, id: &UserId) -> Result<UserSnapshot, ApiError> {
        self.get(&endpoints::user(id.as_str())).await
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: &Registration) -> Result<UserSnapshot, ApiError> {
        input.validate()?;
        self.post(endpoints::USERS, input).await
    }

    /// # Errors
    ///
    /// See [`ShopApi::create_product`].
    #[instrument(skip(self, input), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        id: &UserId,
        input: &UserUpdate,
    ) -> Result<UserSnapshot, ApiError> {
        input.validate()?;
        self.put(&endpoints::user(id.as_str()), input).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the backend rejects the deletion.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) -> Result<Acknowledgement, ApiError> {
        self.delete(&endpoints::user(id.as_str())).await
    }

    /// Dashboard counters and breakdowns.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn stats(&self) -> Result<DashboardStats, ApiError> {
        self.get(endpoints::STATS).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::harness;
    use super::*;
    use crate::cache::CatalogCache;
    use crate::session::{MemorySessionStore, SessionStore};
    use babyshop_core::CategoryType;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_brand_invalidates_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/brands"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/brands"))
            .and(body_json(json!({ "name": "Nest" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "_id": "b1", "name": "Nest" })))
            .mount(&server)
            .await;

        let cache = CatalogCache::default();
        let anonymous = harness(&server, MemorySessionStore::new())
            .api
            .with_cache(cache.clone());
        let admin = harness(&server, MemorySessionStore::from_token("admin"))
            .api
            .with_cache(cache);

        anonymous.brands().await.unwrap();
        anonymous.brands().await.unwrap();
        admin
            .create_brand(&BrandInput {
                name: "Nest".to_string(),
                image: None,
            })
            .await
            .unwrap();
        anonymous.brands().await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_category_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let h = harness(&server, MemorySessionStore::from_token("admin"));
        let err = h
            .api
            .create_category(&CategoryInput {
                name: String::new(),
                image: None,
                category_type: CategoryType::TopCategories,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_users_unwraps_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "users": [{ "_id": "u1", "name": "Ada", "email": "ada@babyshop.com", "role": "deliveryman" }]
            })))
            .mount(&server)
            .await;

        let h = harness(&server, MemorySessionStore::from_token("admin"));
        let users = h.api.users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].role, babyshop_core::Role::Deliveryman);
    }

    #[tokio::test]
    async fn test_forbidden_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/u2"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Not authorized as an admin" })))
            .mount(&server)
            .await;

        let h = harness(&server, MemorySessionStore::from_token("user"));
        let err = h.api.delete_user(&UserId::new("u2")).await.unwrap_err();
        assert_eq!(err.user_message(), "Not authorized as an admin");
        assert!(h.store.load().is_some());
    }
}
