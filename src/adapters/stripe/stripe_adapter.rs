//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API using
//! form-encoded requests and basic auth with the secret key.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new("sk_test_...");
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::PaymentConfig;
use crate::domain::billing::{Customer, Subscription};
use crate::ports::{
    CheckoutLineItem, CheckoutSessionRef, CreateCheckoutRequest, PaymentError, PaymentErrorCode,
    PaymentProvider,
};

/// Stripe API configuration.
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: Option<SecretString>,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key.into())),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Build from application configuration. A missing key leaves the
    /// adapter unconfigured; every call then fails with `NotConfigured`.
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config
                .stripe_secret_key
                .clone()
                .filter(|k| !k.is_empty())
                .map(SecretString::new),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct StripeSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Deserialize)]
struct StripeErrorEnvelope {
    error: StripeErrorBody,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    #[serde(default)]
    message: Option<String>,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> Result<&SecretString, PaymentError> {
        self.config
            .api_key
            .as_ref()
            .ok_or_else(PaymentError::not_configured)
    }

    /// GET a Stripe object by path; 404 maps to `None`.
    async fn retrieve<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, PaymentError> {
        let url = format!("{}/v1/{}", self.config.api_base_url, path);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.api_key()?.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let object = response.json::<T>().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        Ok(Some(object))
    }
}

/// Form parameters for `POST /v1/checkout/sessions`.
fn checkout_params(request: &CreateCheckoutRequest) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![
        ("mode".into(), request.mode().into()),
        ("payment_method_types[0]".into(), "card".into()),
    ];

    match &request.line_item {
        CheckoutLineItem::Subscription { price_id } => {
            params.push(("line_items[0][price]".into(), price_id.to_string()));
        }
        CheckoutLineItem::OneTime {
            amount_cents,
            currency,
            product_name,
            description,
        } => {
            params.push(("line_items[0][price_data][currency]".into(), currency.clone()));
            params.push((
                "line_items[0][price_data][product_data][name]".into(),
                product_name.clone(),
            ));
            params.push((
                "line_items[0][price_data][product_data][description]".into(),
                description.clone(),
            ));
            params.push((
                "line_items[0][price_data][unit_amount]".into(),
                amount_cents.to_string(),
            ));
        }
    }
    params.push(("line_items[0][quantity]".into(), "1".into()));

    for (key, value) in &request.metadata {
        params.push((format!("metadata[{}]", key), value.clone()));
    }
    if matches!(request.line_item, CheckoutLineItem::Subscription { .. }) {
        for (key, value) in &request.subscription_metadata {
            params.push((format!("subscription_data[metadata][{}]", key), value.clone()));
        }
    }
    if let Some(reference) = &request.client_reference_id {
        params.push(("client_reference_id".into(), reference.clone()));
    }

    params.push(("success_url".into(), request.success_url.clone()));
    params.push(("cancel_url".into(), request.cancel_url.clone()));
    params.push((
        "billing_address_collection".into(),
        request.billing_address_collection.as_str().into(),
    ));
    if request.automatic_tax {
        params.push(("automatic_tax[enabled]".into(), "true".into()));
    }
    if request.allow_promotion_codes {
        params.push(("allow_promotion_codes".into(), "true".into()));
    }

    params
}

async fn error_from_response(response: reqwest::Response) -> PaymentError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<StripeErrorEnvelope>(&text)
        .ok()
        .and_then(|e| e.error.message)
        .unwrap_or(text);

    tracing::error!(status = status.as_u16(), error = %message, "Stripe API call failed");

    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        429 => PaymentErrorCode::RateLimitExceeded,
        _ => PaymentErrorCode::ProviderError,
    };
    PaymentError::new(code, message)
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSessionRef, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_params(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.api_key()?.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let session: StripeSessionResponse = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        tracing::info!(
            session_id = %session.id,
            mode = request.mode(),
            "Created Stripe checkout session"
        );

        Ok(CheckoutSessionRef {
            id: session.id,
            url: session.url,
        })
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, PaymentError> {
        let customer: Option<Customer> = self.retrieve(&format!("customers/{}", customer_id)).await?;
        Ok(customer.filter(|c| !c.deleted))
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError> {
        self.retrieve(&format!("subscriptions/{}", subscription_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PriceId;
    use crate::ports::BillingAddressCollection;

    fn find<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn subscription_request() -> CreateCheckoutRequest {
        CreateCheckoutRequest {
            line_item: CheckoutLineItem::Subscription {
                price_id: PriceId::new("price_gavel").unwrap(),
            },
            metadata: vec![
                ("guild_id".to_string(), "223344556677889900".to_string()),
                ("bot_name".to_string(), "gavel".to_string()),
            ],
            subscription_metadata: vec![(
                "guild_id".to_string(),
                "223344556677889900".to_string(),
            )],
            client_reference_id: Some("223344556677889900".to_string()),
            success_url: "https://bots.kojinstudios.com/success.html".to_string(),
            cancel_url: "https://bots.kojinstudios.com/?cancelled=true".to_string(),
            billing_address_collection: BillingAddressCollection::Required,
            automatic_tax: true,
            allow_promotion_codes: false,
        }
    }

    #[test]
    fn subscription_params_reference_price() {
        let params = checkout_params(&subscription_request());

        assert_eq!(find(&params, "mode"), Some("subscription"));
        assert_eq!(find(&params, "line_items[0][price]"), Some("price_gavel"));
        assert_eq!(find(&params, "line_items[0][quantity]"), Some("1"));
        assert_eq!(find(&params, "metadata[bot_name]"), Some("gavel"));
        assert_eq!(
            find(&params, "subscription_data[metadata][guild_id]"),
            Some("223344556677889900")
        );
        assert_eq!(find(&params, "client_reference_id"), Some("223344556677889900"));
        assert_eq!(find(&params, "billing_address_collection"), Some("required"));
        assert_eq!(find(&params, "automatic_tax[enabled]"), Some("true"));
        assert_eq!(find(&params, "allow_promotion_codes"), None);
    }

    #[test]
    fn one_time_params_use_price_data() {
        let mut request = subscription_request();
        request.line_item = CheckoutLineItem::OneTime {
            amount_cents: 1250,
            currency: "usd".to_string(),
            product_name: "Donation to KojinStudios".to_string(),
            description: "Thank you for supporting KojinStudios!".to_string(),
        };
        request.client_reference_id = None;
        request.allow_promotion_codes = true;

        let params = checkout_params(&request);

        assert_eq!(find(&params, "mode"), Some("payment"));
        assert_eq!(find(&params, "line_items[0][price_data][unit_amount]"), Some("1250"));
        assert_eq!(find(&params, "line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(find(&params, "allow_promotion_codes"), Some("true"));
        assert_eq!(find(&params, "client_reference_id"), None);
        // subscription metadata only applies to subscription mode
        assert_eq!(find(&params, "subscription_data[metadata][guild_id]"), None);
    }

    #[tokio::test]
    async fn unconfigured_adapter_fails_without_network() {
        let adapter = StripePaymentAdapter::new(StripeConfig::from_config(&PaymentConfig::default()));

        let result = adapter.create_checkout_session(subscription_request()).await;

        assert_eq!(result.unwrap_err().code, PaymentErrorCode::NotConfigured);
    }

    #[test]
    fn empty_key_is_unconfigured() {
        let config = PaymentConfig {
            stripe_secret_key: Some(String::new()),
            ..Default::default()
        };
        assert!(!StripeConfig::from_config(&config).is_configured());
    }
}
