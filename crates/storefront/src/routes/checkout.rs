//! Hosted checkout creation.
//!
//! `POST /api/create-checkout-session` forwards the shopper's line items to the
//! payment provider unchanged. `POST /user/orders/{id}/checkout` builds the
//! same request from a pending order.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use babyshop_client::checkout::{CheckoutError, CheckoutSessionRequest, items_from_order};
use babyshop_core::OrderId;
use serde::Serialize;
use tracing::{info, instrument};

use crate::error::{AppError, Result};
use crate::state::{AppState, RequestApi};

#[derive(Debug, Serialize)]
pub struct CheckoutCreated {
    pub success: bool,
    pub url: String,
}

/// Create a hosted checkout session. Any failure, an unreadable body included,
/// answers with the generic creation failure.
#[instrument(skip(state, body))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    body: std::result::Result<Json<CheckoutSessionRequest>, JsonRejection>,
) -> Result<Json<CheckoutCreated>> {
    let Json(request) = body.map_err(|e| {
        tracing::warn!(error = %e, "Unreadable checkout request");
        AppError::Checkout(CheckoutError::UnreadableRequest(e.body_text()))
    })?;

    let url = state.checkout().create_session(&request).await?;
    Ok(Json(CheckoutCreated { success: true, url }))
}

/// Start payment for one of the signed-in user's pending orders.
#[instrument(skip(state, backend), fields(order_id = %id))]
pub async fn checkout_order(
    State(state): State<AppState>,
    backend: RequestApi,
    Path(id): Path<OrderId>,
) -> Result<Json<CheckoutCreated>> {
    let order = backend.settle(backend.api.order(&id).await)?;
    let base_url = state.config().base_url.trim_end_matches('/');

    let request = CheckoutSessionRequest {
        items: items_from_order(&order)?,
        success_url: format!(
            "{base_url}/success?orderId={}&session_id={{CHECKOUT_SESSION_ID}}",
            urlencoding_component(order.id.as_str())
        ),
        cancel_url: format!("{base_url}/user/orders/{}", urlencoding_component(order.id.as_str())),
        customer_email: None,
        metadata: BTreeMap::from([("orderId".to_string(), order.id.to_string())]),
    };

    let url = state.checkout().create_session(&request).await?;
    info!(lines = request.items.len(), "Order checkout started");
    Ok(Json(CheckoutCreated { success: true, url }))
}

fn urlencoding_component(segment: &str) -> String {
    url::form_urlencoded::byte_serialize(segment.as_bytes()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::routes::routes;
    use crate::state::test_support;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn post_json(app: axum::Router, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_checkout_returns_provider_url() {
        let stripe = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(body_string_contains("mode=payment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .expect(1)
            .mount(&stripe)
            .await;
        let app = routes().with_state(test_support::state(&stripe.uri(), &stripe.uri()));

        let (status, body) = post_json(
            app,
            "/api/create-checkout-session",
            r#"{"items":[{"name":"Rattle","amount":500,"quantity":2}],"successUrl":"http://localhost:3000/success","cancelUrl":"http://localhost:3000/cart"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "url": "https://checkout.stripe.com/c/pay/cs_test_1" })
        );
    }

    #[tokio::test]
    async fn test_provider_rejection_is_generic_500() {
        let stripe = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "line_items is required" }
            })))
            .expect(1)
            .mount(&stripe)
            .await;
        let app = routes().with_state(test_support::state(&stripe.uri(), &stripe.uri()));

        let (status, body) = post_json(
            app,
            "/api/create-checkout-session",
            r#"{"items":[],"successUrl":"http://localhost:3000/success","cancelUrl":"http://localhost:3000/cart"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to create checkout session" }));
    }

    #[tokio::test]
    async fn test_malformed_item_is_generic_500_without_provider_call() {
        let stripe = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&stripe)
            .await;
        let app = routes().with_state(test_support::state(&stripe.uri(), &stripe.uri()));

        let (status, body) = post_json(
            app,
            "/api/create-checkout-session",
            r#"{"items":[{"name":"Rattle","amount":499.5,"quantity":1}],"successUrl":"http://localhost:3000/success","cancelUrl":"http://localhost:3000/cart"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to create checkout session" }));
    }

    #[test]
    fn test_order_id_is_encoded() {
        assert_eq!(urlencoding_component("a b&c"), "a+b%26c");
    }
}
