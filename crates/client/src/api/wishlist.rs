use babyshop_core::{Product, ProductId, WishlistProducts, WishlistSnapshot};
use serde_json::json;
use tracing::instrument;

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;

impl ShopApi {
    /// Ids on the signed-in user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<WishlistSnapshot, ApiError> {
        self.get(endpoints::WISHLIST).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistSnapshot, ApiError> {
        self.post(endpoints::WISHLIST_ADD, &json!({ "productId": product_id }))
            .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(
        &self,
        product_id: &ProductId,
    ) -> Result<WishlistSnapshot, ApiError> {
        self.delete_with_body(endpoints::WISHLIST_REMOVE, &json!({ "productId": product_id }))
            .await
    }

    /// Full product documents for a set of wishlist ids.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self, product_ids), fields(count = product_ids.len()))]
    pub async fn wishlist_products(&self, product_ids: &[ProductId]) -> Result<Vec<Product>, ApiError> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        let response: WishlistProducts = self
            .post(endpoints::WISHLIST_PRODUCTS, &json!({ "productIds": product_ids }))
            .await?;
        Ok(response.products)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn clear_wishlist(&self) -> Result<WishlistSnapshot, ApiError> {
        self.delete(endpoints::WISHLIST_CLEAR).await
    }
}
