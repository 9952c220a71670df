//! Hosted checkout session creation.
//!
//! The storefront forwards the shopper's line items to the payment provider
//! and hands back the provider's redirect URL. Items are passed through as
//! given; an empty list is still sent and the provider decides. Any failure
//! is reported as one generic error so the shopper can simply retry.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use babyshop_core::{DEFAULT_CURRENCY, Order, to_minor_units};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, instrument};

/// Stripe API host used when none is configured.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Message shown to the shopper for every creation failure.
pub const CREATION_FAILED: &str = "Failed to create checkout session";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

/// One line of the hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in minor currency units.
    pub amount: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub quantity: u32,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionRequest {
    pub items: Vec<CheckoutItem>,
    pub success_url: String,
    pub cancel_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// Session created by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment provider unreachable: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payment provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("payment provider returned a session without a URL")]
    MissingUrl,
}

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Failed to create checkout session")]
    CreationFailed(#[source] PaymentError),

    #[error("price of {name} cannot be expressed in minor units")]
    InvalidAmount { name: String },

    #[error("unreadable checkout request: {0}")]
    UnreadableRequest(String),
}

/// A hosted-checkout provider.
pub trait PaymentProvider: Send + Sync {
    fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> impl Future<Output = Result<HostedSession, PaymentError>> + Send;
}

// =============================================================================
// Stripe
// =============================================================================

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Stripe Checkout Sessions over the form-encoded REST API.
#[derive(Clone)]
pub struct StripeCheckout {
    http: reqwest::Client,
    api_base: String,
    secret_key: SecretString,
}

impl fmt::Debug for StripeCheckout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StripeCheckout")
            .field("api_base", &self.api_base)
            .field("secret_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StripeCheckout {
    #[must_use]
    pub fn new(http: reqwest::Client, api_base: impl Into<String>, secret_key: SecretString) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key,
        }
    }

    /// Form fields for `POST /v1/checkout/sessions`.
    #[must_use]
    pub fn form_fields(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
        let mut fields = vec![
            ("payment_method_types[0]".to_string(), "card".to_string()),
            ("mode".to_string(), "payment".to_string()),
            ("billing_address_collection".to_string(), "auto".to_string()),
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
        ];

        if let Some(email) = request.customer_email.as_deref().filter(|e| !e.is_empty()) {
            fields.push(("customer_email".to_string(), email.to_string()));
        }

        for (i, item) in request.items.iter().enumerate() {
            let price = format!("line_items[{i}][price_data]");
            let currency = if item.currency.is_empty() {
                DEFAULT_CURRENCY
            } else {
                item.currency.as_str()
            };
            fields.push((format!("{price}[currency]"), currency.to_string()));
            fields.push((format!("{price}[product_data][name]"), item.name.clone()));
            if let Some(description) = item.description.as_deref().filter(|d| !d.is_empty()) {
                fields.push((
                    format!("{price}[product_data][description]"),
                    description.to_string(),
                ));
            }
            for (j, image) in item.images.iter().enumerate() {
                fields.push((format!("{price}[product_data][images][{j}]"), image.clone()));
            }
            fields.push((format!("{price}[unit_amount]"), item.amount.to_string()));
            fields.push((format!("line_items[{i}][quantity]"), item.quantity.to_string()));
        }

        for (key, value) in &request.metadata {
            fields.push((format!("metadata[{key}]"), value.clone()));
        }

        fields
    }
}

impl PaymentProvider for StripeCheckout {
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<HostedSession, PaymentError> {
        let response = self
            .http
            .post(format!("{}/v1/checkout/sessions", self.api_base))
            .bearer_auth(self.secret_key.expose_secret())
            .form(&Self::form_fields(request))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<StripeErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.message)
            .unwrap_or_else(|| body.chars().take(200).collect());
        Err(PaymentError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

// =============================================================================
// Service
// =============================================================================

/// Creates checkout sessions through a provider.
#[derive(Debug, Clone)]
pub struct CheckoutService<P> {
    provider: P,
}

impl<P: PaymentProvider> CheckoutService<P> {
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Create a hosted session and return its redirect URL.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::CreationFailed` for any provider failure,
    /// including a session without a URL. Nothing is retried.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> Result<String, CheckoutError> {
        let result = match self.provider.create_session(request).await {
            Ok(session) => session
                .url
                .filter(|url| !url.is_empty())
                .map(|url| (session.id, url))
                .ok_or(PaymentError::MissingUrl),
            Err(e) => Err(e),
        };

        match result {
            Ok((id, url)) => {
                info!(session_id = %id, "Checkout session created");
                Ok(url)
            }
            Err(e) => {
                error!(error = %e, "Error creating checkout session");
                Err(CheckoutError::CreationFailed(e))
            }
        }
    }
}

/// Checkout lines for a pending order.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidAmount` if a price overflows minor units.
pub fn items_from_order(order: &Order) -> Result<Vec<CheckoutItem>, CheckoutError> {
    order
        .items
        .iter()
        .map(|item| {
            let amount = to_minor_units(item.price).ok_or_else(|| CheckoutError::InvalidAmount {
                name: item.name.clone(),
            })?;
            Ok(CheckoutItem {
                name: item.name.clone(),
                description: Some(format!("Quantity: {}", item.quantity)),
                amount,
                currency: default_currency(),
                quantity: item.quantity,
                images: item.image.iter().cloned().collect(),
            })
        })
        .collect()
}
