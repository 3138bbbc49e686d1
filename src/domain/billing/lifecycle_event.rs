//! Verified Stripe events narrowed to the lifecycle the storefront reacts to.

use serde::de::DeserializeOwned;

use super::stripe_event::StripeEvent;
use super::stripe_objects::{CheckoutSession, Invoice, Subscription};
use super::webhook_errors::WebhookError;

/// A payment-lifecycle event with its typed object.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// `checkout.session.completed`; `session.is_payment()` separates donations.
    CheckoutCompleted(CheckoutSession),
    /// `invoice.payment_succeeded`
    InvoicePaid(Invoice),
    /// `customer.subscription.deleted`
    SubscriptionCanceled(Subscription),
    /// `invoice.payment_failed`
    InvoicePaymentFailed(Invoice),
    /// `customer.subscription.updated`
    SubscriptionUpdated(Subscription),
    /// `invoice.upcoming`
    InvoiceUpcoming(Invoice),
    /// Any other event type.
    Unhandled(String),
}

impl LifecycleEvent {
    /// Narrows a verified event.
    ///
    /// # Errors
    ///
    /// `MalformedObject` when a handled event carries an object of the wrong shape.
    pub fn from_stripe(event: &StripeEvent) -> Result<Self, WebhookError> {
        let parsed = match event.event_type.as_str() {
            "checkout.session.completed" => {
                LifecycleEvent::CheckoutCompleted(object(event, "checkout session")?)
            }
            "invoice.payment_succeeded" => LifecycleEvent::InvoicePaid(object(event, "invoice")?),
            "customer.subscription.deleted" => {
                LifecycleEvent::SubscriptionCanceled(object(event, "subscription")?)
            }
            "invoice.payment_failed" => {
                LifecycleEvent::InvoicePaymentFailed(object(event, "invoice")?)
            }
            "customer.subscription.updated" => {
                LifecycleEvent::SubscriptionUpdated(object(event, "subscription")?)
            }
            "invoice.upcoming" => LifecycleEvent::InvoiceUpcoming(object(event, "invoice")?),
            other => LifecycleEvent::Unhandled(other.to_string()),
        };
        Ok(parsed)
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LifecycleEvent::CheckoutCompleted(s) if s.is_payment() => "donation",
            LifecycleEvent::CheckoutCompleted(_) => "subscription_started",
            LifecycleEvent::InvoicePaid(_) => "invoice_paid",
            LifecycleEvent::SubscriptionCanceled(_) => "subscription_canceled",
            LifecycleEvent::InvoicePaymentFailed(_) => "invoice_payment_failed",
            LifecycleEvent::SubscriptionUpdated(_) => "subscription_updated",
            LifecycleEvent::InvoiceUpcoming(_) => "invoice_upcoming",
            LifecycleEvent::Unhandled(_) => "unhandled",
        }
    }
}

fn object<T: DeserializeOwned>(event: &StripeEvent, name: &'static str) -> Result<T, WebhookError> {
    event
        .deserialize_object()
        .map_err(|e| WebhookError::MalformedObject {
            object: name,
            reason: e.to_string(),
        })
}
