//! Catalog administration: products, categories, brands and banners.

use babyshop_client::ShopApi;
use babyshop_client::api::{CategoryQuery, ProductQuery};
use babyshop_core::{
    BannerId, BannerInput, BrandId, BrandInput, CategoryId, CategoryInput, CategoryType,
    ProductId, ProductInput, SortOrder,
};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::CliError;

// =============================================================================
// Products
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum ProductAction {
    /// List products, optionally filtered
    List(ProductFilter),
    /// Show one product
    Get { id: String },
    /// Create a product
    Create(ProductFields),
    /// Replace a product
    Update {
        id: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct ProductFilter {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub limit: Option<u32>,
    /// Sort newest first
    #[arg(long)]
    pub desc: bool,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub price_min: Option<Decimal>,
    #[arg(long)]
    pub price_max: Option<Decimal>,
    #[arg(long)]
    pub search: Option<String>,
}

impl From<ProductFilter> for ProductQuery {
    fn from(filter: ProductFilter) -> Self {
        Self {
            page: filter.page,
            limit: filter.limit,
            sort_order: filter.desc.then_some(SortOrder::Desc),
            category: filter.category.map(CategoryId::from),
            brand: filter.brand.map(BrandId::from),
            price_min: filter.price_min,
            price_max: filter.price_max,
            search: filter.search,
        }
    }
}

#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub price: Decimal,
    /// Discount in percent (0-100)
    #[arg(long, default_value = "0")]
    pub discount: Decimal,
    #[arg(long, default_value_t = 0)]
    pub stock: i64,
    #[arg(long)]
    pub category: String,
    #[arg(long)]
    pub brand: String,
    /// Image URL
    #[arg(long)]
    pub image: String,
}

impl From<ProductFields> for ProductInput {
    fn from(fields: ProductFields) -> Self {
        Self {
            name: fields.name,
            description: fields.description,
            price: fields.price,
            discount_percentage: fields.discount,
            stock: fields.stock,
            category: CategoryId::from(fields.category),
            brand: BrandId::from(fields.brand),
            image: fields.image,
        }
    }
}

/// # Errors
///
/// Returns `CliError::Api` for invalid input or a failed call.
pub async fn products(api: &ShopApi, action: ProductAction) -> Result<Value, CliError> {
    let value = match action {
        ProductAction::List(filter) => {
            serde_json::to_value(api.products(&filter.into()).await?)?
        }
        ProductAction::Get { id } => serde_json::to_value(api.product(&ProductId::from(id)).await?)?,
        ProductAction::Create(fields) => {
            serde_json::to_value(api.create_product(&fields.into()).await?)?
        }
        ProductAction::Update { id, fields } => serde_json::to_value(
            api.update_product(&ProductId::from(id), &fields.into())
                .await?,
        )?,
        ProductAction::Delete { id } => {
            serde_json::to_value(api.delete_product(&ProductId::from(id)).await?)?
        }
    };
    Ok(value)
}

// =============================================================================
// Categories
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        per_page: Option<u32>,
    },
    /// Show one category
    Get { id: String },
    /// Create a category
    Create(CategoryFields),
    /// Replace a category
    Update {
        id: String,
        #[command(flatten)]
        fields: CategoryFields,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct CategoryFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub image: Option<String>,
    /// "Featured", "Hot Categories" or "Top Categories"
    #[arg(long = "type")]
    pub category_type: CategoryType,
}

impl From<CategoryFields> for CategoryInput {
    fn from(fields: CategoryFields) -> Self {
        Self {
            name: fields.name,
            image: fields.image,
            category_type: fields.category_type,
        }
    }
}

/// # Errors
///
/// Returns `CliError::Api` for invalid input or a failed call.
pub async fn categories(api: &ShopApi, action: CategoryAction) -> Result<Value, CliError> {
    let value = match action {
        CategoryAction::List { page, per_page } => {
            let query = CategoryQuery {
                page,
                per_page,
                sort_order: None,
            };
            serde_json::to_value(api.categories(&query).await?)?
        }
        CategoryAction::Get { id } => {
            serde_json::to_value(api.category(&CategoryId::from(id)).await?)?
        }
        CategoryAction::Create(fields) => {
            serde_json::to_value(api.create_category(&fields.into()).await?)?
        }
        CategoryAction::Update { id, fields } => serde_json::to_value(
            api.update_category(&CategoryId::from(id), &fields.into())
                .await?,
        )?,
        CategoryAction::Delete { id } => {
            serde_json::to_value(api.delete_category(&CategoryId::from(id)).await?)?
        }
    };
    Ok(value)
}

// =============================================================================
// Brands
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum BrandAction {
    /// List brands
    List,
    /// Show one brand
    Get { id: String },
    /// Create a brand
    Create(BrandFields),
    /// Replace a brand
    Update {
        id: String,
        #[command(flatten)]
        fields: BrandFields,
    },
    /// Delete a brand
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct BrandFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub image: Option<String>,
}

impl From<BrandFields> for BrandInput {
    fn from(fields: BrandFields) -> Self {
        Self {
            name: fields.name,
            image: fields.image,
        }
    }
}

/// # Errors
///
/// Returns `CliError::Api` for invalid input or a failed call.
pub async fn brands(api: &ShopApi, action: BrandAction) -> Result<Value, CliError> {
    let value = match action {
        BrandAction::List => serde_json::to_value(api.brands().await?)?,
        BrandAction::Get { id } => serde_json::to_value(api.brand(&BrandId::from(id)).await?)?,
        BrandAction::Create(fields) => serde_json::to_value(api.create_brand(&fields.into()).await?)?,
        BrandAction::Update { id, fields } => serde_json::to_value(
            api.update_brand(&BrandId::from(id), &fields.into()).await?,
        )?,
        BrandAction::Delete { id } => {
            serde_json::to_value(api.delete_brand(&BrandId::from(id)).await?)?
        }
    };
    Ok(value)
}

// =============================================================================
// Banners
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum BannerAction {
    /// List banners
    List,
    /// Show one banner
    Get { id: String },
    /// Create a banner
    Create(BannerFields),
    /// Replace a banner
    Update {
        id: String,
        #[command(flatten)]
        fields: BannerFields,
    },
    /// Delete a banner
    Delete { id: String },
}

#[derive(Debug, Args)]
pub struct BannerFields {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub title: String,
    /// "Starting from" price
    #[arg(long)]
    pub start_from: Decimal,
    #[arg(long)]
    pub image: String,
    #[arg(long = "type")]
    pub banner_type: String,
}

impl From<BannerFields> for BannerInput {
    fn from(fields: BannerFields) -> Self {
        Self {
            name: fields.name,
            title: fields.title,
            start_from: fields.start_from,
            image: fields.image,
            banner_type: fields.banner_type,
        }
    }
}

/// # Errors
///
/// Returns `CliError::Api` for invalid input or a failed call.
pub async fn banners(api: &ShopApi, action: BannerAction) -> Result<Value, CliError> {
    let value = match action {
        BannerAction::List => serde_json::to_value(api.banners().await?)?,
        BannerAction::Get { id } => serde_json::to_value(api.banner(&BannerId::from(id)).await?)?,
        BannerAction::Create(fields) => {
            serde_json::to_value(api.create_banner(&fields.into()).await?)?
        }
        BannerAction::Update { id, fields } => serde_json::to_value(
            api.update_banner(&BannerId::from(id), &fields.into())
                .await?,
        )?,
        BannerAction::Delete { id } => {
            serde_json::to_value(api.delete_banner(&BannerId::from(id)).await?)?
        }
    };
    Ok(value)
}
