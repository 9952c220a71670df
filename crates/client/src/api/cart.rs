use babyshop_core::{CartSnapshot, ProductId};
use serde_json::json;
use tracing::instrument;

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;

impl ShopApi {
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn cart(&self) -> Result<CartSnapshot, ApiError> {
        self.get(endpoints::CART).await
    }

    /// Add `quantity` units, merging with an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, ApiError> {
        self.post(
            endpoints::CART,
            &json!({ "productId": product_id, "quantity": quantity }),
        )
        .await
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<CartSnapshot, ApiError> {
        self.put(
            endpoints::CART_UPDATE,
            &json!({ "productId": product_id, "quantity": quantity }),
        )
        .await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_cart(&self, product_id: &ProductId) -> Result<CartSnapshot, ApiError> {
        self.delete(&endpoints::cart_item(product_id.as_str())).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<CartSnapshot, ApiError> {
        self.delete(endpoints::CART).await
    }
}
