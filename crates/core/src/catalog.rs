//! Catalog records: products, categories, brands and banners.
//!
//! Read-mostly documents served by the backend. Prices are standard currency
//! units carried as JSON numbers.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{BannerId, BrandId, CategoryId, CategoryType, ProductId};

/// A reference the backend may or may not have populated.
///
/// List endpoints populate `category`/`brand` with a partial document; cart
/// snapshots sometimes carry only the raw id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Populated<T, I> {
    Id(I),
    Document(T),
}

impl<T, I> Populated<T, I> {
    /// The populated document, if the backend expanded the reference.
    #[must_use]
    pub const fn document(&self) -> Option<&T> {
        match self {
            Self::Id(_) => None,
            Self::Document(doc) => Some(doc),
        }
    }
}

impl Populated<Category, CategoryId> {
    /// Referenced category id.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        match self {
            Self::Id(id) => id,
            Self::Document(category) => &category.id,
        }
    }
}

impl Populated<Brand, BrandId> {
    /// Referenced brand id.
    #[must_use]
    pub const fn id(&self) -> &BrandId {
        match self {
            Self::Id(id) => id,
            Self::Document(brand) => &brand.id,
        }
    }
}

/// A product as returned by `/products` and embedded in cart/wishlist snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: Option<Populated<Category, CategoryId>>,
    #[serde(default)]
    pub brand: Option<Populated<Brand, BrandId>>,
    #[serde(default)]
    pub ratings: Vec<serde_json::Value>,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Absent when the category was populated with `name` only.
    #[serde(default)]
    pub category_type: Option<CategoryType>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// One page of the category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPage {
    pub categories: Vec<Category>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    #[serde(rename = "_id")]
    pub id: BrandId,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A home page banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    #[serde(rename = "_id")]
    pub id: BannerId,
    pub name: String,
    pub title: String,
    /// "Starting from" price shown on the banner.
    #[serde(with = "rust_decimal::serde::float")]
    pub start_from: Decimal,
    pub image: String,
    pub banner_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Admin inputs
// =============================================================================

/// Body for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub stock: i64,
    pub category: CategoryId,
    pub brand: BrandId,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub category_type: CategoryType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BannerInput {
    pub name: String,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub start_from: Decimal,
    pub image: String,
    pub banner_type: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_with_populated_references() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Soft Blanket",
            "description": "Organic cotton",
            "price": 25,
            "discountPercentage": 10,
            "stock": 4,
            "averageRating": 4.5,
            "image": "https://cdn/blanket.png",
            "category": { "_id": "c1", "name": "Bedding" },
            "brand": { "_id": "b1", "name": "Nest" },
            "ratings": []
        }))
        .unwrap();

        assert_eq!(product.price, Decimal::from(25));
        assert_eq!(product.discount_percentage, Decimal::from(10));
        let category = product.category.unwrap();
        assert_eq!(category.id().as_str(), "c1");
        assert_eq!(category.document().unwrap().category_type, None);
    }

    #[test]
    fn test_product_with_raw_id_references() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p2",
            "name": "Bottle",
            "price": 12.5,
            "category": "c9",
            "brand": "b9"
        }))
        .unwrap();

        assert_eq!(product.category.unwrap().id().as_str(), "c9");
        assert_eq!(product.brand.unwrap().id().as_str(), "b9");
        assert_eq!(product.stock, 0);
        assert!(product.image.is_empty());
    }

    #[test]
    fn test_category_page_camel_case() {
        let page: CategoryPage = serde_json::from_value(json!({
            "categories": [
                { "_id": "c1", "name": "Toys", "categoryType": "Hot Categories" }
            ],
            "total": 1,
            "page": 1,
            "perPage": 20,
            "totalPages": 1
        }))
        .unwrap();

        assert_eq!(page.per_page, 20);
        assert_eq!(
            page.categories[0].category_type,
            Some(CategoryType::HotCategories)
        );
    }

    #[test]
    fn test_product_input_sends_numbers() {
        let input = ProductInput {
            name: "Crib".to_string(),
            description: "Solid wood crib".to_string(),
            price: Decimal::new(19_950, 2),
            discount_percentage: Decimal::ZERO,
            stock: 3,
            category: CategoryId::new("c1"),
            brand: BrandId::new("b1"),
            image: "crib.png".to_string(),
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["price"], json!(199.5));
        assert_eq!(value["discountPercentage"], json!(0.0));
    }
}
