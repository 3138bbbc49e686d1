//! Stripe billing: webhook verification, lifecycle events and their context.

mod billing_context;
mod lifecycle_event;
mod stripe_event;
mod stripe_objects;
mod webhook_errors;
mod webhook_verifier;

pub use billing_context::BillingContext;
pub use lifecycle_event::LifecycleEvent;
pub use stripe_event::{StripeEvent, StripeEventData};
pub use stripe_objects::{
    metadata_value, CheckoutSession, Customer, CustomerDetails, Invoice, Metadata, Price,
    Recurring, Subscription, SubscriptionItem, SubscriptionItems, BOT_NAME_KEY, GUILD_ID_KEY,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{
    decode_base64_body, signature_header, SignatureHeader, StripeWebhookVerifier,
    MAX_CLOCK_SKEW_SECS, MAX_EVENT_AGE_SECS,
};

#[cfg(test)]
pub(crate) use stripe_event::StripeEventBuilder;
