use babyshop_core::{
    Banner, BannerId, Brand, BrandId, Category, CategoryId, CategoryPage, Product, ProductId,
    ProductPage, SortOrder,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;
use crate::query::build_query_string;

/// Filters for the product listing. Unset fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_order: Option<SortOrder>,
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price_max: Option<Decimal>,
    pub search: Option<String>,
}

/// Paging for the category listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub sort_order: Option<SortOrder>,
}

impl ShopApi {
    /// # Errors
    ///
    /// Returns `ApiError` if the query is malformed or the call fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<ProductPage, ApiError> {
        let endpoint = format!("{}{}", endpoints::PRODUCTS, build_query_string(query)?);
        self.cached_get(endpoint).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Status` with `404` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.cached_get(endpoints::product(id.as_str())).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn categories(&self, query: &CategoryQuery) -> Result<CategoryPage, ApiError> {
        let endpoint = format!("{}{}", endpoints::CATEGORIES, build_query_string(query)?);
        self.cached_get(endpoint).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn category(&self, id: &CategoryId) -> Result<Category, ApiError> {
        self.cached_get(endpoints::category(id.as_str())).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, ApiError> {
        self.cached_get(endpoints::BRANDS.to_string()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn brand(&self, id: &BrandId) -> Result<Brand, ApiError> {
        self.cached_get(endpoints::brand(id.as_str())).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn banners(&self) -> Result<Vec<Banner>, ApiError> {
        self.cached_get(endpoints::BANNERS.to_string()).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn banner(&self, id: &BannerId) -> Result<Banner, ApiError> {
        self.cached_get(endpoints::banner(id.as_str())).await
    }
}
