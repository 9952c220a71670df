//! Wishlist and cart of the signed-in account.

use babyshop_client::ShopApi;
use babyshop_core::{CartSnapshot, ProductId};
use clap::Subcommand;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};

use crate::error::CliError;

#[derive(Debug, Subcommand)]
pub enum WishlistAction {
    /// Show wishlist products
    Show,
    /// Add a product
    Add { product_id: String },
    /// Remove a product
    Remove { product_id: String },
    /// Empty the wishlist
    Clear,
}

/// # Errors
///
/// Returns `CliError::Api` if a call fails.
pub async fn wishlist(api: &ShopApi, action: WishlistAction) -> Result<Value, CliError> {
    let snapshot = match action {
        WishlistAction::Show => {
            let snapshot = api.wishlist().await?;
            let products = api.wishlist_products(&snapshot.wishlist).await?;
            return Ok(serde_json::to_value(products)?);
        }
        WishlistAction::Add { product_id } => {
            api.add_to_wishlist(&ProductId::from(product_id)).await?
        }
        WishlistAction::Remove { product_id } => {
            api.remove_from_wishlist(&ProductId::from(product_id))
                .await?
        }
        WishlistAction::Clear => api.clear_wishlist().await?,
    };
    Ok(json!({ "wishlist": snapshot.wishlist, "message": snapshot.message }))
}

#[derive(Debug, Subcommand)]
pub enum CartAction {
    /// Show cart lines and totals
    Show,
    /// Add units of a product
    Add {
        product_id: String,
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Set the quantity of a line
    Update {
        product_id: String,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        quantity: u32,
    },
    /// Remove a line
    Remove { product_id: String },
    /// Empty the cart
    Clear,
}

/// # Errors
///
/// Returns `CliError::Api` if a call fails, or `CliError::CartTotal` if the
/// subtotal overflows.
pub async fn cart(api: &ShopApi, action: CartAction) -> Result<Value, CliError> {
    let snapshot = match action {
        CartAction::Show => api.cart().await?,
        CartAction::Add {
            product_id,
            quantity,
        } => {
            api.add_to_cart(&ProductId::from(product_id), quantity)
                .await?
        }
        CartAction::Update {
            product_id,
            quantity,
        } => {
            api.update_cart_item(&ProductId::from(product_id), quantity)
                .await?
        }
        CartAction::Remove { product_id } => {
            api.remove_from_cart(&ProductId::from(product_id))
                .await?
        }
        CartAction::Clear => api.clear_cart().await?,
    };
    cart_summary(&snapshot)
}

fn cart_summary(snapshot: &CartSnapshot) -> Result<Value, CliError> {
    let subtotal = snapshot.subtotal().ok_or(CliError::CartTotal)?;
    Ok(json!({
        "items": snapshot.cart,
        "totalQuantity": snapshot.total_quantity(),
        "subtotal": subtotal.to_f64(),
    }))
}
