//! Backend paths, relative to the API base URL.
//!
//! Path segments taken from ids are percent-encoded.

use urlencoding::encode;

pub const LOGIN: &str = "/auth/login";
pub const REGISTER: &str = "/auth/register";
pub const LOGOUT: &str = "/auth/logout";
pub const PROFILE: &str = "/auth/profile";

pub const PRODUCTS: &str = "/products";
pub const CATEGORIES: &str = "/categories";
pub const BRANDS: &str = "/brands";
pub const BANNERS: &str = "/banners";

pub const USERS: &str = "/users";
pub const STATS: &str = "/stats";

pub const WISHLIST: &str = "/wishlist";
pub const WISHLIST_ADD: &str = "/wishlist/add";
pub const WISHLIST_REMOVE: &str = "/wishlist/remove";
pub const WISHLIST_PRODUCTS: &str = "/wishlist/products";
pub const WISHLIST_CLEAR: &str = "/wishlist/clear";

pub const CART: &str = "/cart";
pub const CART_UPDATE: &str = "/cart/update";

pub const ORDERS: &str = "/orders";

fn item(collection: &str, id: &str) -> String {
    format!("{collection}/{}", encode(id))
}

#[must_use]
pub fn product(id: &str) -> String {
    item(PRODUCTS, id)
}

#[must_use]
pub fn category(id: &str) -> String {
    item(CATEGORIES, id)
}

#[must_use]
pub fn brand(id: &str) -> String {
    item(BRANDS, id)
}

#[must_use]
pub fn banner(id: &str) -> String {
    item(BANNERS, id)
}

#[must_use]
pub fn user(id: &str) -> String {
    item(USERS, id)
}

#[must_use]
pub fn cart_item(product_id: &str) -> String {
    item(CART, product_id)
}

#[must_use]
pub fn order(id: &str) -> String {
    item(ORDERS, id)
}

#[must_use]
pub fn order_status(id: &str) -> String {
    format!("{}/status", order(id))
}

/// `/users/:id/addresses`
#[must_use]
pub fn addresses(user_id: &str) -> String {
    format!("{}/addresses", user(user_id))
}

/// `/users/:id/addresses/:addressId`
#[must_use]
pub fn address(user_id: &str, address_id: &str) -> String {
    item(&addresses(user_id), address_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        assert_eq!(product("p1"), "/products/p1");
        assert_eq!(cart_item("p1"), "/cart/p1");
        assert_eq!(order_status("o1"), "/orders/o1/status");
        assert_eq!(addresses("u1"), "/users/u1/addresses");
        assert_eq!(address("u1", "a1"), "/users/u1/addresses/a1");
    }

    #[test]
    fn test_segments_are_encoded() {
        assert_eq!(product("a/b c"), "/products/a%2Fb%20c");
    }
}
