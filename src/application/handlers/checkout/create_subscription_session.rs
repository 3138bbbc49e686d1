//! CreateSubscriptionSessionHandler - Starts a hosted checkout for a bot subscription.

use std::sync::Arc;

use crate::domain::billing::{BOT_NAME_KEY, GUILD_ID_KEY};
use crate::domain::catalog::Catalog;
use crate::domain::checkout::PurchaseIntent;
use crate::ports::{
    BillingAddressCollection, CheckoutLineItem, CheckoutSessionRef, CreateCheckoutRequest,
    PaymentProvider,
};

use super::{CreateSessionError, RedirectUrls};

/// Raw storefront input; every field is optional until validated.
#[derive(Debug, Clone, Default)]
pub struct CreateSubscriptionSessionCommand {
    pub price_id: Option<String>,
    pub guild_id: Option<String>,
    pub bot_name: Option<String>,
    /// Storefront origin used for the redirect URLs.
    pub origin: String,
}

pub struct CreateSubscriptionSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    catalog: Arc<Catalog>,
    source_tag: String,
}

impl CreateSubscriptionSessionHandler {
    pub fn new(
        payment_provider: Arc<dyn PaymentProvider>,
        catalog: Arc<Catalog>,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            payment_provider,
            catalog,
            source_tag: source_tag.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionSessionCommand,
    ) -> Result<CheckoutSessionRef, CreateSessionError> {
        let intent = PurchaseIntent::validate(
            &self.catalog,
            cmd.price_id.as_deref(),
            cmd.guild_id.as_deref(),
            cmd.bot_name.as_deref(),
        )?;

        let metadata = vec![
            (GUILD_ID_KEY.to_string(), intent.guild_id.to_string()),
            (BOT_NAME_KEY.to_string(), intent.bot_name().to_string()),
            ("source".to_string(), self.source_tag.clone()),
        ];
        let urls = RedirectUrls::for_origin(&cmd.origin, false);

        let request = CreateCheckoutRequest {
            line_item: CheckoutLineItem::Subscription {
                price_id: intent.price_id.clone(),
            },
            subscription_metadata: metadata.clone(),
            metadata,
            client_reference_id: Some(intent.guild_id.to_string()),
            success_url: urls.success,
            cancel_url: urls.cancel,
            billing_address_collection: BillingAddressCollection::Required,
            automatic_tax: true,
            allow_promotion_codes: false,
        };

        let session = self.payment_provider.create_checkout_session(request).await?;

        tracing::info!(
            session_id = %session.id,
            guild_id = %intent.guild_id,
            bot_name = intent.bot_name(),
            "Subscription checkout session created"
        );

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::domain::checkout::CheckoutError;
    use crate::ports::PaymentError;

    const GAVEL_PRICE: &str = "price_1RqJNHBV80dUyFnbQ70XJRYO";
    const GUILD: &str = "223344556677889900";

    fn handler(provider: &MockPaymentProvider) -> CreateSubscriptionSessionHandler {
        CreateSubscriptionSessionHandler::new(
            Arc::new(provider.clone()),
            Arc::new(Catalog::standard()),
            "bots.kojinstudios.com",
        )
    }

    fn command(price: &str, guild: &str, bot: &str) -> CreateSubscriptionSessionCommand {
        CreateSubscriptionSessionCommand {
            price_id: Some(price.to_string()),
            guild_id: Some(guild.to_string()),
            bot_name: Some(bot.to_string()),
            origin: "https://bots.kojinstudios.com".to_string(),
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Success Path
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn creates_subscription_session_bound_to_guild() {
        let provider = MockPaymentProvider::new();

        let session = handler(&provider)
            .handle(command(GAVEL_PRICE, GUILD, "gavel"))
            .await
            .unwrap();

        assert!(session.id.starts_with("cs_test_"));
        let requests = provider.checkout_requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.mode(), "subscription");
        assert_eq!(request.client_reference_id.as_deref(), Some(GUILD));
        assert_eq!(request.metadata_value("guild_id"), Some(GUILD));
        assert_eq!(request.metadata_value("bot_name"), Some("gavel"));
        assert_eq!(request.metadata_value("source"), Some("bots.kojinstudios.com"));
        assert_eq!(request.subscription_metadata, request.metadata);
        assert_eq!(request.billing_address_collection, BillingAddressCollection::Required);
        assert!(request.automatic_tax);
        assert!(request.success_url.starts_with("https://bots.kojinstudios.com/success.html"));
    }

    #[tokio::test]
    async fn host_alias_is_stored_as_canonical_bot_name() {
        let provider = MockPaymentProvider::new();

        handler(&provider)
            .handle(command("price_1RqJMaBV80dUyFnbhCpWxsq8", GUILD, "host"))
            .await
            .unwrap();

        let request = &provider.checkout_requests()[0];
        assert_eq!(request.metadata_value("bot_name"), Some("kojinhost"));
    }

    #[tokio::test]
    async fn identical_submissions_create_two_sessions() {
        let provider = MockPaymentProvider::new();
        let handler = handler(&provider);

        let first = handler.handle(command(GAVEL_PRICE, GUILD, "gavel")).await.unwrap();
        let second = handler.handle(command(GAVEL_PRICE, GUILD, "gavel")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(provider.checkout_requests().len(), 2);
    }

    // ══════════════════════════════════════════════════════════════
    // Validation
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn missing_fields_never_reach_provider() {
        let provider = MockPaymentProvider::new();
        let cmd = CreateSubscriptionSessionCommand {
            price_id: Some(GAVEL_PRICE.to_string()),
            guild_id: None,
            bot_name: Some("gavel".to_string()),
            origin: String::new(),
        };

        let err = handler(&provider).handle(cmd).await.unwrap_err();

        assert_eq!(err, CreateSessionError::Invalid(CheckoutError::MissingFields));
        assert_eq!(provider.call_count("create_checkout_session"), 0);
    }

    #[tokio::test]
    async fn malformed_guild_id_is_rejected() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider)
            .handle(command(GAVEL_PRICE, "12345abc678901234", "gavel"))
            .await
            .unwrap_err();

        assert_eq!(err, CreateSessionError::Invalid(CheckoutError::InvalidGuildId));
        assert!(provider.checkout_requests().is_empty());
    }

    #[tokio::test]
    async fn price_from_another_product_is_rejected() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider)
            .handle(command(GAVEL_PRICE, GUILD, "tickets"))
            .await
            .unwrap_err();

        assert_eq!(err, CreateSessionError::Invalid(CheckoutError::PriceMismatch));
    }

    // ══════════════════════════════════════════════════════════════
    // Provider Failures
    // ══════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn provider_failure_is_surfaced() {
        let provider = MockPaymentProvider::new();
        provider.fail_checkout(PaymentError::provider("No such price"));

        let err = handler(&provider)
            .handle(command(GAVEL_PRICE, GUILD, "gavel"))
            .await
            .unwrap_err();

        match err {
            CreateSessionError::Provider(e) => assert_eq!(e.message, "No such price"),
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
