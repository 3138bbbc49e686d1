//! Application handlers.
//!
//! Command handlers that orchestrate domain operations through ports.

pub mod checkout;
pub mod oauth;
pub mod webhook;

pub use checkout::{
    CreateDonationSessionCommand, CreateDonationSessionHandler, CreateSessionError,
    CreateSubscriptionSessionCommand, CreateSubscriptionSessionHandler, RedirectUrls,
};
pub use oauth::{
    ExchangeCodeCommand, ExchangeCodeHandler, GuildMembershipResolver, IssueAuthUrlCommand,
    IssueAuthUrlHandler, OAuthError, OAuthSettings,
};
pub use webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, LifecycleOutcome, SideEffect,
};
