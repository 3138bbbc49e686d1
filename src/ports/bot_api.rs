//! Port for the external bot-management API.
//!
//! The bot fleet keeps its own database of servers and subscriptions; this
//! service only asks it where bots are installed and tells it when a
//! subscription starts or ends.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[async_trait]
pub trait BotApi: Send + Sync {
    /// True when a base URL is configured.
    fn is_configured(&self) -> bool;

    /// True when subscription updates should be sent.
    ///
    /// False for a missing base URL and for local or placeholder hosts.
    fn accepts_updates(&self) -> bool;

    /// `GET {base}/check-server?guild_id&bot_name`.
    ///
    /// Non-2xx answers are `BotApiError::Status`.
    async fn check_server(&self, guild_id: &str, bot_name: &str) -> Result<bool, BotApiError>;

    /// `GET {base}/servers?bot_name`: guild IDs where the bot is installed.
    async fn list_servers(&self, bot_name: &str) -> Result<Vec<String>, BotApiError>;

    /// `POST {base}` with a subscription change.
    async fn update_subscription(&self, update: &SubscriptionUpdate) -> Result<(), BotApiError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionAction {
    Activated,
    Deactivated,
}

impl SubscriptionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionAction::Activated => "activated",
            SubscriptionAction::Deactivated => "deactivated",
        }
    }
}

/// Checkout details forwarded with an activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub amount_total: Option<i64>,
    pub customer_email: Option<String>,
}

/// Body of a subscription update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionUpdate {
    pub server_id: String,
    pub bot_name: Option<String>,
    pub action: SubscriptionAction,
    pub session: Option<SessionSummary>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BotApiError {
    #[error("Bot API base URL not configured")]
    NotConfigured,

    #[error("Bot API returned {0}")]
    Status(u16),

    #[error("Bot API request timed out")]
    Timeout,

    #[error("Bot API request failed: {0}")]
    Transport(String),

    #[error("Unexpected bot API response: {0}")]
    InvalidResponse(String),
}
