//! Wishlist, cart and order snapshots.
//!
//! These collections are owned by the backend; the frontends only mirror the
//! latest response and derive quantity totals from it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{OrderId, OrderStatus, ProductId, UserId};

/// Response of every `/wishlist` mutation: the ids currently on the list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WishlistSnapshot {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub wishlist: Vec<ProductId>,
    #[serde(default)]
    pub message: Option<String>,
}

impl WishlistSnapshot {
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.wishlist.contains(product_id)
    }
}

/// Response of `POST /wishlist/products`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WishlistProducts {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A cart line with its populated product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "productId")]
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    /// Unit price times quantity, `None` if it overflows.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product.price.checked_mul(Decimal::from(self.quantity))
    }
}

/// Response of every `/cart` call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CartSnapshot {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub message: Option<String>,
}

impl CartSnapshot {
    /// Sum of line quantities (the cart badge count).
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.cart.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals before shipping and tax, `None` if it overflows.
    #[must_use]
    pub fn subtotal(&self) -> Option<Decimal> {
        self.cart.iter().try_fold(Decimal::ZERO, |total, line| {
            total.checked_add(line.line_total()?)
        })
    }

    /// Quantity of one product in the cart, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.cart
            .iter()
            .filter(|line| &line.product.id == product_id)
            .map(|line| line.quantity)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A cart line as sent when creating an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineInput {
    #[serde(rename = "_id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&CartLine> for OrderLineInput {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            name: line.product.name.clone(),
            price: line.product.price,
            quantity: line.quantity,
            image: Some(line.product.image.clone()).filter(|image| !image.is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderLineInput>,
    pub shipping_address: ShippingAddress,
}

/// The order endpoint answers either `{ "order": {...} }` or the bare order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OrderEnvelope {
    Wrapped { order: Order },
    Bare(Order),
}

impl OrderEnvelope {
    #[must_use]
    pub fn into_order(self) -> Order {
        match self {
            Self::Wrapped { order } | Self::Bare(order) => order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stripe_session_id: Option<String>,
}

// =============================================================================
// Admin dashboard
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCounts {
    pub users: u64,
    pub products: u64,
    pub categories: u64,
    pub brands: u64,
    pub orders: u64,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_revenue: Decimal,
}

/// A labelled count for the dashboard charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedCount {
    pub name: Option<String>,
    pub value: u64,
}

/// Response of `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub counts: StatsCounts,
    #[serde(default)]
    pub roles: Vec<NamedCount>,
    #[serde(default)]
    pub categories: Vec<NamedCount>,
    #[serde(default)]
    pub brands: Vec<NamedCount>,
}

/// Plain `{ "message": ... }` acknowledgement returned by deletes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: String,
}
