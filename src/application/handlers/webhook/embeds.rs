//! Notification embeds for billing lifecycle events.

use chrono::DateTime;

use crate::domain::billing::{metadata_value, BillingContext, CheckoutSession, Invoice, Subscription};
use crate::domain::notification::{colors, format_usd, Embed};
use crate::ports::SubscriptionAction;

pub const SUBSCRIPTION_FOOTER: &str = "KojinStudios Bots - Subscription System";
pub const DONATION_FOOTER: &str = "KojinStudios Bots - Donation System";

const NOT_PROVIDED: &str = "Not provided";
const ANONYMOUS: &str = "Anonymous";

fn invoice_link(invoice: &Invoice) -> Option<String> {
    invoice
        .id
        .as_deref()
        .map(|id| format!("[View in Stripe](https://dashboard.stripe.com/invoices/{})", id))
}

fn calendar_date(unix: i64) -> String {
    DateTime::from_timestamp(unix, 0)
        .map(|date| date.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn with_context(embed: Embed, ctx: &BillingContext) -> Embed {
    embed
        .field_if("Bot", ctx.bot_name.as_deref(), true)
        .field_if("Server ID", ctx.guild_id.as_deref(), true)
}

pub fn donation(session: &CheckoutSession) -> Embed {
    let donor = metadata_value(&session.metadata, "donor_name").unwrap_or(ANONYMOUS);
    let message = metadata_value(&session.metadata, "donor_message");

    Embed::new(
        "New Donation Received",
        format!("Thank you {} for your generous donation!", donor),
        colors::GOLD,
        DONATION_FOOTER,
    )
    .field("Amount", format_usd(session.amount_total.unwrap_or(0)), true)
    .field("Donor", donor, true)
    .field("Email", session.customer_email().unwrap_or(NOT_PROVIDED), true)
    .field_if("Message", message, false)
}

/// "Activated" / "Deactivated" announcement for a guild.
pub fn subscription_status(
    guild_id: &str,
    bot_name: Option<&str>,
    action: SubscriptionAction,
    session: Option<&CheckoutSession>,
) -> Embed {
    let bot = bot_name.unwrap_or("Subscription");
    let (verb, color) = match action {
        SubscriptionAction::Activated => ("Activated", colors::GREEN),
        SubscriptionAction::Deactivated => ("Deactivated", colors::RED),
    };

    let embed = Embed::new(
        format!("{} {}", bot, verb),
        format!("{} has been {} for server {}", bot, action.as_str(), guild_id),
        color,
        SUBSCRIPTION_FOOTER,
    );

    match session {
        Some(session) => embed.field(
            "Payment Details",
            format!(
                "Amount: {}\nCustomer: {}",
                format_usd(session.amount_total.unwrap_or(0)),
                session.customer_email().unwrap_or("Unknown")
            ),
            true,
        ),
        None => embed,
    }
}

pub fn recurring_payment(invoice: &Invoice, ctx: &BillingContext) -> Embed {
    let embed = Embed::new(
        "Recurring Payment Received",
        "Monthly subscription payment processed successfully",
        colors::GREEN,
        SUBSCRIPTION_FOOTER,
    )
    .field("Amount", format_usd(invoice.amount_paid), true)
    .field(
        "Billing Period",
        format!("<t:{}:D> - <t:{}:D>", invoice.period_start, invoice.period_end),
        true,
    );

    with_context(embed, ctx)
        .field("Customer", ctx.customer_email.as_deref().unwrap_or(NOT_PROVIDED), true)
        .field_if("Invoice", invoice_link(invoice), false)
}

pub fn payment_failed(
    invoice: &Invoice,
    ctx: &BillingContext,
    subscription: Option<&Subscription>,
) -> Embed {
    let embed = Embed::new(
        "Payment Failed",
        "A subscription payment could not be processed",
        colors::RED,
        SUBSCRIPTION_FOOTER,
    )
    .field("Amount", format_usd(invoice.amount_due), true)
    .field("Customer", ctx.customer_email.as_deref().unwrap_or(NOT_PROVIDED), true);

    let status = subscription.map(|s| {
        if s.is_past_due() {
            "Multiple retries remaining"
        } else {
            "Final attempt"
        }
    });

    with_context(embed, ctx)
        .field_if("Status", status, true)
        .field_if("Invoice", invoice_link(invoice), false)
        .field("Note", "Stripe will automatically retry this payment.", false)
}

pub fn subscription_updated(subscription: &Subscription, ctx: &BillingContext) -> Embed {
    let description = if subscription.cancel_at_period_end {
        "Subscription scheduled for cancellation"
    } else if subscription.is_active() {
        "Subscription plan updated"
    } else {
        "Subscription updated"
    };

    let amount = if subscription.has_items() {
        let price = subscription.first_price();
        let cents = price.and_then(|p| p.unit_amount).unwrap_or(0);
        let interval = price
            .and_then(|p| p.recurring.as_ref())
            .and_then(|r| r.interval.as_deref())
            .unwrap_or("month");
        format!("{}/{}", format_usd(cents), interval)
    } else {
        "N/A".to_string()
    };

    let cancels_on = subscription
        .cancel_at_period_end
        .then_some(subscription.current_period_end)
        .flatten()
        .map(calendar_date);

    let embed = Embed::new("Subscription Updated", description, colors::BLUE, SUBSCRIPTION_FOOTER)
        .field("Status", &subscription.status, true)
        .field("Amount", amount, true);

    with_context(embed, ctx)
        .field_if("Cancels On", cancels_on, true)
        .field("Customer", ctx.customer_email.as_deref().unwrap_or(NOT_PROVIDED), true)
}

pub fn upcoming_invoice(invoice: &Invoice, ctx: &BillingContext) -> Embed {
    let embed = Embed::new(
        "Upcoming Payment",
        "Payment will be processed in 7 days",
        colors::ORANGE,
        SUBSCRIPTION_FOOTER,
    )
    .field("Amount", format_usd(invoice.amount_due), true)
    .field("Due Date", calendar_date(invoice.period_end), true);

    with_context(embed, ctx).field(
        "Customer",
        ctx.customer_email.as_deref().unwrap_or(NOT_PROVIDED),
        true,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn session(value: serde_json::Value) -> CheckoutSession {
        serde_json::from_value(value).unwrap()
    }

    fn ctx(guild: Option<&str>, bot: Option<&str>) -> BillingContext {
        BillingContext {
            guild_id: guild.map(str::to_string),
            bot_name: bot.map(str::to_string),
            customer_email: None,
        }
    }

    #[test]
    fn donation_embed_lists_donor_and_message() {
        let embed = donation(&session(json!({
            "id": "cs_1",
            "mode": "payment",
            "amount_total": 1250,
            "customer_details": {"email": "fan@example.org"},
            "metadata": {"donor_name": "Kai", "donor_message": "Keep it up"}
        })));

        assert_eq!(embed.title, "New Donation Received");
        assert_eq!(embed.color, colors::GOLD);
        assert_eq!(embed.field_value("Amount"), Some("$12.50"));
        assert_eq!(embed.field_value("Donor"), Some("Kai"));
        assert_eq!(embed.field_value("Email"), Some("fan@example.org"));
        assert_eq!(embed.field_value("Message"), Some("Keep it up"));
        assert_eq!(embed.footer.text, DONATION_FOOTER);
    }

    #[test]
    fn donation_message_is_capped_for_chat() {
        let long = "x".repeat(2000);
        let embed = donation(&session(json!({
            "id": "cs_1",
            "mode": "payment",
            "metadata": {"donor_message": long}
        })));

        assert_eq!(embed.field_value("Message").map(str::len), Some(1024));
        assert_eq!(embed.field_value("Donor"), Some("Anonymous"));
        assert_eq!(embed.field_value("Email"), Some("Not provided"));
    }

    #[test]
    fn activation_embed_includes_payment_details() {
        let checkout = session(json!({
            "id": "cs_1",
            "mode": "subscription",
            "amount_total": 499,
            "customer_details": {"email": "owner@example.org"}
        }));

        let embed = subscription_status(
            "223344556677889900",
            Some("gavel"),
            SubscriptionAction::Activated,
            Some(&checkout),
        );

        assert_eq!(embed.title, "gavel Activated");
        assert_eq!(embed.description, "gavel has been activated for server 223344556677889900");
        assert_eq!(embed.color, colors::GREEN);
        assert_eq!(
            embed.field_value("Payment Details"),
            Some("Amount: $4.99\nCustomer: owner@example.org")
        );
    }

    #[test]
    fn failed_payment_status_depends_on_subscription() {
        let invoice: Invoice = serde_json::from_value(json!({"id": "in_1", "amount_due": 499})).unwrap();
        let past_due: Subscription =
            serde_json::from_value(json!({"id": "sub_1", "status": "past_due"})).unwrap();
        let unpaid: Subscription =
            serde_json::from_value(json!({"id": "sub_1", "status": "unpaid"})).unwrap();

        let ctx = ctx(Some("223344556677889900"), None);
        assert_eq!(
            payment_failed(&invoice, &ctx, Some(&past_due)).field_value("Status"),
            Some("Multiple retries remaining")
        );
        assert_eq!(
            payment_failed(&invoice, &ctx, Some(&unpaid)).field_value("Status"),
            Some("Final attempt")
        );
        let without = payment_failed(&invoice, &ctx, None);
        assert_eq!(without.field_value("Status"), None);
        assert_eq!(
            without.field_value("Invoice"),
            Some("[View in Stripe](https://dashboard.stripe.com/invoices/in_1)")
        );
    }

    #[test]
    fn invoice_without_id_has_no_dashboard_link() {
        let invoice: Invoice = serde_json::from_value(json!({"amount_due": 499})).unwrap();

        let embed = payment_failed(&invoice, &ctx(None, None), None);

        assert_eq!(embed.field_value("Invoice"), None);
        assert_eq!(embed.field_value("Amount"), Some("$4.99"));
    }

    #[test]
    fn update_description_prefers_pending_cancellation() {
        let subscription: Subscription = serde_json::from_value(json!({
            "id": "sub_1",
            "status": "active",
            "cancel_at_period_end": true,
            "current_period_end": 1735689600,
            "items": {"data": [{"price": {"unit_amount": 999, "recurring": {"interval": "year"}}}]}
        }))
        .unwrap();

        let embed = subscription_updated(&subscription, &ctx(None, Some("tickets")));

        assert_eq!(embed.description, "Subscription scheduled for cancellation");
        assert_eq!(embed.field_value("Amount"), Some("$9.99/year"));
        assert_eq!(embed.field_value("Cancels On"), Some("January 1, 2025"));
        assert_eq!(embed.field_value("Bot"), Some("tickets"));
        assert_eq!(embed.field_value("Server ID"), None);
    }

    #[test]
    fn update_without_items_shows_na() {
        let subscription: Subscription =
            serde_json::from_value(json!({"id": "sub_1", "status": "trialing"})).unwrap();

        let embed = subscription_updated(&subscription, &ctx(None, None));

        assert_eq!(embed.description, "Subscription updated");
        assert_eq!(embed.field_value("Amount"), Some("N/A"));
        assert_eq!(embed.field_value("Cancels On"), None);
    }
}
