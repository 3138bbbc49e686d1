//! Which guild and bot a billing event concerns.

use super::stripe_objects::{
    metadata_value, CheckoutSession, Customer, Subscription, BOT_NAME_KEY, GUILD_ID_KEY,
};

/// Guild, bot and contact recovered from Stripe records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillingContext {
    pub guild_id: Option<String>,
    pub bot_name: Option<String>,
    pub customer_email: Option<String>,
}

impl BillingContext {
    /// From a completed checkout: `client_reference_id` first, then session metadata.
    pub fn from_checkout(session: &CheckoutSession) -> Self {
        let guild_id = session
            .client_reference_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| metadata_value(&session.metadata, GUILD_ID_KEY));

        Self {
            guild_id: guild_id.map(str::to_string),
            bot_name: metadata_value(&session.metadata, BOT_NAME_KEY).map(str::to_string),
            customer_email: session.customer_email().map(str::to_string),
        }
    }

    /// Customer metadata first, then subscription metadata.
    pub fn from_records(
        customer: Option<&Customer>,
        subscription: Option<&Subscription>,
        fallback_email: Option<&str>,
    ) -> Self {
        let lookup = |key: &str| {
            customer
                .and_then(|c| metadata_value(&c.metadata, key))
                .or_else(|| subscription.and_then(|s| metadata_value(&s.metadata, key)))
                .map(str::to_string)
        };

        let customer_email = customer
            .and_then(|c| c.email.as_deref())
            .or(fallback_email)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        Self {
            guild_id: lookup(GUILD_ID_KEY),
            bot_name: lookup(BOT_NAME_KEY),
            customer_email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::stripe_objects::Metadata;

    fn metadata(pairs: &[(&str, &str)]) -> Metadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn session(client_reference_id: Option<&str>, meta: Metadata) -> CheckoutSession {
        CheckoutSession {
            id: "cs_1".to_string(),
            mode: "subscription".to_string(),
            amount_total: Some(500),
            customer: None,
            customer_details: None,
            client_reference_id: client_reference_id.map(str::to_string),
            subscription: None,
            metadata: meta,
        }
    }

    fn customer(meta: Metadata, email: Option<&str>) -> Customer {
        Customer {
            id: "cus_1".to_string(),
            email: email.map(str::to_string),
            metadata: meta,
            deleted: false,
        }
    }

    fn subscription(meta: Metadata) -> Subscription {
        Subscription {
            id: "sub_1".to_string(),
            customer: Some("cus_1".to_string()),
            status: "active".to_string(),
            cancel_at_period_end: false,
            current_period_end: None,
            metadata: meta,
            items: None,
        }
    }

    #[test]
    fn client_reference_id_wins_over_metadata() {
        let s = session(
            Some("223344556677889900"),
            metadata(&[("guild_id", "111111111111111111"), ("bot_name", "gavel")]),
        );
        let ctx = BillingContext::from_checkout(&s);
        assert_eq!(ctx.guild_id.as_deref(), Some("223344556677889900"));
        assert_eq!(ctx.bot_name.as_deref(), Some("gavel"));
    }

    #[test]
    fn metadata_guild_used_without_client_reference() {
        let s = session(None, metadata(&[("guild_id", "111111111111111111")]));
        let ctx = BillingContext::from_checkout(&s);
        assert_eq!(ctx.guild_id.as_deref(), Some("111111111111111111"));
        assert!(ctx.bot_name.is_none());
    }

    #[test]
    fn customer_metadata_preferred_over_subscription() {
        let c = customer(metadata(&[("guild_id", "1")]), Some("a@example.com"));
        let s = subscription(metadata(&[("guild_id", "2"), ("bot_name", "tickets")]));

        let ctx = BillingContext::from_records(Some(&c), Some(&s), None);

        assert_eq!(ctx.guild_id.as_deref(), Some("1"));
        // per-key fallback
        assert_eq!(ctx.bot_name.as_deref(), Some("tickets"));
        assert_eq!(ctx.customer_email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn invoice_email_used_when_customer_has_none() {
        let c = customer(Metadata::new(), None);
        let ctx = BillingContext::from_records(Some(&c), None, Some("b@example.com"));
        assert_eq!(ctx.customer_email.as_deref(), Some("b@example.com"));
    }

    #[test]
    fn no_records_means_no_context() {
        let ctx = BillingContext::from_records(None, None, None);
        assert_eq!(ctx, BillingContext::default());
    }
}
