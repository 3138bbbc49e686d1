//! Stripe webhook handling.

pub mod embeds;
mod handle_stripe_webhook;

pub use handle_stripe_webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, LifecycleOutcome, SideEffect,
};
