//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `STOREFRONT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use bot_storefront::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod bot_api;
mod discord;
mod error;
mod notification;
mod payment;
mod server;

pub use bot_api::BotApiConfig;
pub use discord::{BotsConfig, DiscordConfig};
pub use error::{ConfigError, ValidationError};
pub use notification::NotificationConfig;
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults so the process starts with partial configuration.
/// Features whose secrets are missing report a configuration error per request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, public URL)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Discord OAuth application and bot credentials
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Discord application IDs of the sellable bots
    #[serde(default)]
    pub bots: BotsConfig,

    /// External bot-management API
    #[serde(default)]
    pub bot_api: BotApiConfig,

    /// Discord webhook notification channels
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `STOREFRONT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `STOREFRONT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `STOREFRONT__PAYMENT__STRIPE_SECRET_KEY=...` -> `payment.stripe_secret_key = ...`
    /// - `STOREFRONT__BOTS__GAVEL_ID=...` -> `bots.gavel_id = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("STOREFRONT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.discord.validate()?;
        self.bots.validate()?;
        self.bot_api.validate()?;
        self.notifications.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
