//! Post-payment landing page.

use axum::{Json, extract::Query};
use babyshop_core::{OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::error::Result;
use crate::state::RequestApi;

#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    #[serde(rename = "orderId")]
    pub order_id: Option<OrderId>,
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub message: &'static str,
    pub order_id: Option<OrderId>,
    pub status: Option<OrderStatus>,
}

/// `GET /success`, where the payment provider sends the shopper back.
///
/// With an order id the order is marked paid and linked to the checkout
/// session; without one the page only confirms the payment.
#[instrument(skip(backend, params))]
pub async fn success(
    backend: RequestApi,
    Query(params): Query<SuccessParams>,
) -> Result<Json<PaymentConfirmation>> {
    let Some(order_id) = params.order_id else {
        return Ok(Json(PaymentConfirmation {
            message: "Payment successful",
            order_id: None,
            status: None,
        }));
    };

    let order = backend.settle(
        backend
            .api
            .update_order_status(&order_id, OrderStatus::Paid, None, params.session_id)
            .await,
    )?;
    info!(order_id = %order.id, "Order marked paid");

    Ok(Json(PaymentConfirmation {
        message: "Payment successful",
        order_id: Some(order.id),
        status: Some(order.status),
    }))
}
