//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe: hosted checkout
//! sessions plus customer and subscription lookups.
//!
//! # Configuration
//!
//! - `STOREFRONT__PAYMENT__STRIPE_SECRET_KEY`: Stripe secret API key
//! - `STOREFRONT__PAYMENT__API_BASE_URL`: override for tests and proxies

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
