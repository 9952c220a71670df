//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//!
//! # Catalog (cached for anonymous visitors)
//! GET  /api/products                  - Product listing (page, limit, sortOrder, category, brand, priceMin, priceMax, search)
//! GET  /api/products/{id}             - Product detail
//! GET  /api/categories                - Category listing
//! GET  /api/brands                    - Brands
//! GET  /api/banners                   - Home page banners
//!
//! # Checkout
//! POST /api/create-checkout-session   - Hosted checkout for arbitrary line items
//! POST /user/orders/{id}/checkout     - Hosted checkout for a pending order
//! GET  /success                       - Return from the payment provider
//!
//! # Auth (signed-in users are redirected to /user/profile)
//! GET  /auth/signin                   - Sign-in form
//! POST /auth/signin                   - Sign in, sets the auth_token cookie
//! GET  /auth/signup                   - Sign-up form
//! POST /auth/signup                   - Create an account
//! POST /api/signout                   - Sign out, expires the cookie
//!
//! # Account (requires a verified session)
//! GET  /user/profile                  - Current user
//! GET  /user/orders                   - Order history
//! GET  /user/orders/{id}              - One order
//! GET  /user/cart                     - Cart with totals
//! POST /user/cart                     - Add a line to the cart
//! GET  /user/wishlist                 - Wishlist products
//! ```

pub mod account;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Catalog reads.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(catalog::products))
        .route("/products/{id}", get(catalog::product))
        .route("/categories", get(catalog::categories))
        .route("/brands", get(catalog::brands))
        .route("/banners", get(catalog::banners))
}

/// Sign-in and sign-up pages.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signin", get(auth::signin_page).post(auth::signin))
        .route("/signup", get(auth::signup_page).post(auth::signup))
}

/// Account pages.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(account::profile))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
        .route("/orders/{id}/checkout", post(checkout::checkout_order))
        .route("/cart", get(account::cart).post(account::add_to_cart))
        .route("/wishlist", get(account::wishlist))
}

/// Every storefront route, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest(
            "/api",
            catalog_routes()
                .route(
                    "/create-checkout-session",
                    post(checkout::create_checkout_session),
                )
                .route("/signout", post(auth::signout)),
        )
        .nest("/auth", auth_routes())
        .nest("/user", account_routes())
        .route("/success", get(pages::success))
}
