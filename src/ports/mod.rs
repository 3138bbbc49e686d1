//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Stripe checkout sessions and record lookups
//! - `DiscordApi` - OAuth code exchange and guild lookups
//! - `BotApi` - External bot-management API
//! - `Notifier` - Operator notifications (Discord webhooks)

mod bot_api;
mod discord_api;
mod notifier;
mod payment_provider;

pub use bot_api::{BotApi, BotApiError, SessionSummary, SubscriptionAction, SubscriptionUpdate};
pub use discord_api::{DiscordApi, DiscordApiError, DiscordAuth};
pub use notifier::{NotificationChannel, NotificationError, Notifier};
pub use payment_provider::{
    BillingAddressCollection, CheckoutLineItem, CheckoutSessionRef, CreateCheckoutRequest,
    PaymentError, PaymentErrorCode, PaymentProvider,
};
