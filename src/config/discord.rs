//! Discord configuration (OAuth application, bot credentials, bot IDs)

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::catalog::BotKey;

use super::error::ValidationError;

/// Discord OAuth and bot credential configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordConfig {
    /// OAuth application client ID used for the server picker
    pub client_id: Option<String>,

    /// OAuth application client secret
    pub client_secret: Option<String>,

    /// Fixed redirect URI; falls back to the request Origin, then the public URL
    pub redirect_uri: Option<String>,

    /// Bot application client ID for the client-credentials grant
    pub bot_client_id: Option<String>,

    /// Bot application client secret
    pub bot_client_secret: Option<String>,

    /// Static bot token used when the client-credentials grant fails
    pub bot_token: Option<String>,

    /// Discord REST base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl DiscordConfig {
    /// OAuth client credentials, if both halves are set.
    pub fn oauth_credentials(&self) -> Option<(&str, &str)> {
        match (self.client_id.as_deref(), self.client_secret.as_deref()) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Bot application credentials, if both halves are set.
    pub fn bot_credentials(&self) -> Option<(&str, &str)> {
        match (
            self.bot_client_id.as_deref(),
            self.bot_client_secret.as_deref(),
        ) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => Some((id, secret)),
            _ => None,
        }
    }

    /// Validate Discord configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if url::Url::parse(&self.api_base_url).is_err() {
            return Err(ValidationError::InvalidUrl("discord.api_base_url"));
        }
        if let Some(uri) = self.redirect_uri.as_deref() {
            if url::Url::parse(uri).is_err() {
                return Err(ValidationError::InvalidUrl("discord.redirect_uri"));
            }
        }
        Ok(())
    }
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            redirect_uri: None,
            bot_client_id: None,
            bot_client_secret: None,
            bot_token: None,
            api_base_url: default_api_base_url(),
        }
    }
}

/// Discord application IDs of the sellable bots
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BotsConfig {
    pub gavel_id: Option<String>,
    pub tickets_id: Option<String>,
    pub host_id: Option<String>,
}

impl BotsConfig {
    /// Configured application IDs keyed by bot.
    pub fn application_ids(&self) -> HashMap<BotKey, String> {
        [
            (BotKey::Gavel, &self.gavel_id),
            (BotKey::Tickets, &self.tickets_id),
            (BotKey::Host, &self.host_id),
        ]
        .into_iter()
        .filter_map(|(bot, id)| {
            id.as_deref()
                .filter(|id| !id.is_empty())
                .map(|id| (bot, id.to_string()))
        })
        .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, id) in [
            ("gavel", &self.gavel_id),
            ("tickets", &self.tickets_id),
            ("host", &self.host_id),
        ] {
            if let Some(id) = id {
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ValidationError::InvalidApplicationId(name));
                }
            }
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    "https://discord.com/api".to_string()
}
