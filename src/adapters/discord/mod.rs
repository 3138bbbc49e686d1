//! Discord adapters.
//!
//! - `DiscordClient` implements `DiscordApi` (OAuth2 token endpoint and REST)
//! - `DiscordWebhookNotifier` implements `Notifier` via channel webhooks
//!
//! # Configuration
//!
//! - `STOREFRONT__DISCORD__CLIENT_ID` / `CLIENT_SECRET`: OAuth application
//! - `STOREFRONT__DISCORD__BOT_CLIENT_ID` / `BOT_CLIENT_SECRET`: bot application
//! - `STOREFRONT__NOTIFICATIONS__WEBHOOK_URL`: general channel webhook

mod discord_client;
mod mock_discord_api;
mod recording_notifier;
mod webhook_notifier;

pub use discord_client::DiscordClient;
pub use mock_discord_api::MockDiscordApi;
pub use recording_notifier::RecordingNotifier;
pub use webhook_notifier::DiscordWebhookNotifier;
