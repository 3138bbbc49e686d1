//! HTTP DTOs (Data Transfer Objects) for storefront endpoints.
//!
//! Field names follow the storefront frontend (camelCase), except the OAuth
//! query string which uses Discord's parameter names.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Product;
use crate::domain::checkout::AmountInput;
use crate::domain::guild::{Guild, GuildPartition};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(default)]
    pub bot_name: Option<String>,
}

/// Donation amount as the form sends it: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Number(f64),
    Text(String),
}

impl From<AmountValue> for AmountInput {
    fn from(value: AmountValue) -> Self {
        match value {
            AmountValue::Number(n) => AmountInput::Number(n),
            AmountValue::Text(s) => AmountInput::Text(s),
        }
    }
}

/// Body of `POST /api/create-donation-session`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateDonationSessionRequest {
    #[serde(default)]
    pub amount: Option<AmountValue>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Query string of `GET /api/discord-oauth`.
///
/// Without `code` the endpoint issues an authorization URL; with it the
/// endpoint completes the exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordOAuthQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub bot_name: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUrlResponse {
    pub auth_url: String,
}

/// Guilds the user can manage, split by whether the selected bot is present.
///
/// `guilds` repeats `guildsWithBot` for older storefront builds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildsResponse {
    pub success: bool,
    pub guilds: Vec<Guild>,
    pub guilds_with_bot: Vec<Guild>,
    pub other_guilds: Vec<Guild>,
}

impl From<GuildPartition> for GuildsResponse {
    fn from(partition: GuildPartition) -> Self {
        Self {
            success: true,
            guilds: partition.with_bot.clone(),
            guilds_with_bot: partition.with_bot,
            other_guilds: partition.others,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookReceivedResponse {
    pub received: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
}

/// Error body. `error` is always present; the other fields depend on the endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: None,
            error: error.into(),
            details: None,
            detail: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn unsuccessful(mut self) -> Self {
        self.success = Some(false);
        self
    }
}
