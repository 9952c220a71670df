use babyshop_core::{
    Acknowledgement, CartSnapshot, NewOrder, Order, OrderEnvelope, OrderId, OrderLineInput,
    OrderStatus, OrderStatusUpdate, ShippingAddress,
};
use tracing::{info, instrument};

use super::ShopApi;
use crate::endpoints;
use crate::error::ApiError;

impl ShopApi {
    /// Turn the current cart into a pending order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self, cart, shipping_address), fields(lines = cart.cart.len()))]
    pub async fn create_order(
        &self,
        cart: &CartSnapshot,
        shipping_address: ShippingAddress,
    ) -> Result<Order, ApiError> {
        let body = NewOrder {
            items: cart.cart.iter().map(OrderLineInput::from).collect(),
            shipping_address,
        };
        let envelope: OrderEnvelope = self.post(endpoints::ORDERS, &body).await?;
        let order = envelope.into_order();
        info!(order_id = %order.id, total = %order.total, "Order created");
        Ok(order)
    }

    /// The signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.get(endpoints::ORDERS).await
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        let envelope: OrderEnvelope = self.get(&endpoints::order(id.as_str())).await?;
        Ok(envelope.into_order())
    }

    /// Record a status change, e.g. `paid` after checkout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self, payment_intent_id, stripe_session_id), fields(order_id = %id))]
    pub async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
        payment_intent_id: Option<String>,
        stripe_session_id: Option<String>,
    ) -> Result<Order, ApiError> {
        let body = OrderStatusUpdate {
            status,
            payment_intent_id,
            stripe_session_id,
        };
        let envelope: OrderEnvelope = self
            .put(&endpoints::order_status(id.as_str()), &body)
            .await?;
        Ok(envelope.into_order())
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the call fails.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: &OrderId) -> Result<Acknowledgement, ApiError> {
        self.delete(&endpoints::order(id.as_str())).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::harness;
    use super::*;
    use crate::session::MemorySessionStore;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn order_json(status: &str) -> serde_json::Value {
        json!({
            "_id": "o1",
            "userId": "u1",
            "items": [{ "productId": "p1", "name": "Rattle", "price": 5, "quantity": 2 }],
            "total": 10,
            "status": status,
            "shippingAddress": { "street": "1 Main", "city": "Oslo", "country": "NO", "postalCode": "0150" },
            "createdAt": "2025-01-02T03:04:05Z",
            "updatedAt": "2025-01-02T03:04:05Z"
        })
    }

    #[tokio::test]
    async fn test_create_order_from_cart() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/orders"))
            .and(body_partial_json(json!({
                "items": [{ "_id": "p1", "name": "Rattle", "price": 5.0, "quantity": 2 }],
                "shippingAddress": { "city": "Oslo" }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "order": order_json("pending") })))
            .expect(1)
            .mount(&server)
            .await;

        let cart: CartSnapshot = serde_json::from_value(json!({
            "success": true,
            "cart": [{ "productId": { "_id": "p1", "name": "Rattle", "price": 5 }, "quantity": 2 }]
        }))
        .unwrap();

        let h = harness(&server, MemorySessionStore::from_token("t"));
        let order = h
            .api
            .create_order(
                &cart,
                ShippingAddress {
                    street: "1 Main".to_string(),
                    city: "Oslo".to_string(),
                    country: "NO".to_string(),
                    postal_code: "0150".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_update_status_accepts_bare_order() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/orders/o1/status"))
            .and(body_partial_json(json!({ "status": "paid", "stripeSessionId": "cs_1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json("paid")))
            .mount(&server)
            .await;

        let h = harness(&server, MemorySessionStore::from_token("t"));
        let order = h
            .api
            .update_order_status(&OrderId::new("o1"), OrderStatus::Paid, None, Some("cs_1".to_string()))
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
    }
}
