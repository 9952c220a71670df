//! Account routes under `/user`.
//!
//! The guard middleware has already verified the cookie (or failed open).
//! Every call here carries the cookie's token; a `401` from the backend ends
//! the session with a redirect to sign-in.

use axum::{
    Json,
    extract::Path,
};
use babyshop_core::{CartLine, CartSnapshot, Order, OrderId, Product, ProductId, UserSnapshot};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result, set_sentry_user};
use crate::state::RequestApi;

#[instrument(skip(backend))]
pub async fn profile(backend: RequestApi) -> Result<Json<UserSnapshot>> {
    let user = backend.settle(backend.api.profile().await)?;
    set_sentry_user(&user.id, Some(user.email.as_str()));
    Ok(Json(user))
}

#[instrument(skip(backend))]
pub async fn orders(backend: RequestApi) -> Result<Json<Vec<Order>>> {
    Ok(Json(backend.settle(backend.api.orders().await)?))
}

#[instrument(skip(backend))]
pub async fn order(backend: RequestApi, Path(id): Path<OrderId>) -> Result<Json<Order>> {
    Ok(Json(backend.settle(backend.api.order(&id).await)?))
}

/// Cart with the totals shown in the header badge and summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_quantity: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

impl TryFrom<CartSnapshot> for CartView {
    type Error = AppError;

    fn try_from(cart: CartSnapshot) -> Result<Self> {
        let subtotal = cart
            .subtotal()
            .ok_or_else(|| AppError::Internal("cart subtotal overflows".to_string()))?;
        Ok(Self {
            total_quantity: cart.total_quantity(),
            subtotal,
            items: cart.cart,
        })
    }
}

#[instrument(skip(backend))]
pub async fn cart(backend: RequestApi) -> Result<Json<CartView>> {
    let cart = backend.settle(backend.api.cart().await)?;
    Ok(Json(CartView::try_from(cart)?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineForm {
    pub product_id: ProductId,
    pub quantity: u32,
}

#[instrument(skip(backend, form), fields(product_id = %form.product_id))]
pub async fn add_to_cart(backend: RequestApi, Json(form): Json<CartLineForm>) -> Result<Json<CartView>> {
    if form.quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
    }
    let cart = backend.settle(backend.api.add_to_cart(&form.product_id, form.quantity).await)?;
    Ok(Json(CartView::try_from(cart)?))
}

/// Wishlist expanded to full product documents.
#[instrument(skip(backend))]
pub async fn wishlist(backend: RequestApi) -> Result<Json<Vec<Product>>> {
    let snapshot = backend.settle(backend.api.wishlist().await)?;
    let products = backend.settle(backend.api.wishlist_products(&snapshot.wishlist).await)?;
    Ok(Json(products))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::routes::routes;
    use crate::state::test_support;
    use axum::body::{Body, to_bytes};
    use axum::http::header::{LOCATION, SET_COOKIE};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("cookie", "auth_token=tok")
            .header("content-type", "application/json");
        builder
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_cart_totals() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cart": [
                    { "productId": { "_id": "p1", "name": "Rattle", "price": 5 }, "quantity": 2 },
                    { "productId": { "_id": "p2", "name": "Bib", "price": 2.5 }, "quantity": 1 }
                ]
            })))
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app.oneshot(request("GET", "/user/cart", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["totalQuantity"], json!(3));
        assert_eq!(body["subtotal"], json!(12.5));
    }

    #[tokio::test]
    async fn test_cart_with_overflowing_subtotal_is_server_error() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cart": [
                    { "productId": { "_id": "p1", "name": "Rattle", "price": 7.0e27 }, "quantity": 100 }
                ]
            })))
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app.oneshot(request("GET", "/user/cart", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn test_add_to_cart_forwards_line() {
        let backend = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cart"))
            .and(body_json(json!({ "productId": "p1", "quantity": 2 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "cart": [{ "productId": { "_id": "p1", "name": "Rattle", "price": 5 }, "quantity": 2 }]
            })))
            .expect(1)
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app
            .oneshot(request(
                "POST",
                "/user/cart",
                Some(json!({ "productId": "p1", "quantity": 2 })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["totalQuantity"], json!(2));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected_locally() {
        let backend = MockServer::start().await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app
            .oneshot(request(
                "POST",
                "/user/cart",
                Some(json!({ "productId": "p1", "quantity": 0 })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_backend_signs_out() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/orders"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app.oneshot(request("GET", "/user/orders", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[LOCATION], "/auth/signin");
        assert!(
            response.headers()[SET_COOKIE]
                .to_str()
                .unwrap()
                .starts_with("auth_token=;")
        );
    }

    #[tokio::test]
    async fn test_empty_wishlist_skips_product_lookup() {
        let backend = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/wishlist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true, "wishlist": [] })))
            .mount(&backend)
            .await;
        let app = routes().with_state(test_support::state(&backend.uri(), &backend.uri()));

        let response = app.oneshot(request("GET", "/user/wishlist", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!([]));
        assert_eq!(backend.received_requests().await.unwrap().len(), 1);
    }
}
