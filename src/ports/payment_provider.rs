//! Payment provider port for external payment processing.
//!
//! Defines the contract for the payment gateway (Stripe): creating hosted
//! checkout sessions and re-fetching the records lifecycle events refer to.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::domain::billing::{Customer, Subscription};
use crate::domain::foundation::PriceId;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a hosted checkout session.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSessionRef, PaymentError>;

    /// Get customer by provider ID. Deleted or unknown customers are `None`.
    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, PaymentError>;

    /// Get subscription by provider ID.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError>;
}

/// What the checkout session charges for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutLineItem {
    /// Recurring price from the catalog.
    Subscription { price_id: PriceId },
    /// Ad-hoc one-time amount.
    OneTime {
        amount_cents: i64,
        currency: String,
        product_name: String,
        description: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingAddressCollection {
    Auto,
    Required,
}

impl BillingAddressCollection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingAddressCollection::Auto => "auto",
            BillingAddressCollection::Required => "required",
        }
    }
}

/// Request to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCheckoutRequest {
    pub line_item: CheckoutLineItem,
    /// Session metadata, in insertion order.
    pub metadata: Vec<(String, String)>,
    /// Metadata copied onto the created subscription (subscription mode only).
    pub subscription_metadata: Vec<(String, String)>,
    pub client_reference_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub billing_address_collection: BillingAddressCollection,
    pub automatic_tax: bool,
    pub allow_promotion_codes: bool,
}

impl CreateCheckoutRequest {
    /// Stripe checkout mode.
    pub fn mode(&self) -> &'static str {
        match self.line_item {
            CheckoutLineItem::Subscription { .. } => "subscription",
            CheckoutLineItem::OneTime { .. } => "payment",
        }
    }

    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Reference to a created checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSessionRef {
    pub id: String,
    pub url: Option<String>,
}

/// Payment provider error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// The payment provider has no API key configured.
    pub fn not_configured() -> Self {
        Self::new(
            PaymentErrorCode::NotConfigured,
            "Payment provider is not configured",
        )
    }
}

/// Payment error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,

    /// No credentials configured.
    NotConfigured,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError | PaymentErrorCode::RateLimitExceeded
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn mode_follows_line_item() {
        let mut request = CreateCheckoutRequest {
            line_item: CheckoutLineItem::Subscription {
                price_id: PriceId::new("price_1").unwrap(),
            },
            metadata: vec![("guild_id".to_string(), "1".to_string())],
            subscription_metadata: vec![],
            client_reference_id: None,
            success_url: "https://example.com/ok".to_string(),
            cancel_url: "https://example.com/".to_string(),
            billing_address_collection: BillingAddressCollection::Required,
            automatic_tax: true,
            allow_promotion_codes: false,
        };
        assert_eq!(request.mode(), "subscription");
        assert_eq!(request.metadata_value("guild_id"), Some("1"));

        request.line_item = CheckoutLineItem::OneTime {
            amount_cents: 500,
            currency: "usd".to_string(),
            product_name: "Donation".to_string(),
            description: "Thanks".to_string(),
        };
        assert_eq!(request.mode(), "payment");
    }

    #[test]
    fn network_errors_are_retryable() {
        assert!(PaymentError::network("timeout").retryable);
        assert!(!PaymentError::provider("bad request").retryable);
        assert!(!PaymentError::not_configured().retryable);
    }
}
