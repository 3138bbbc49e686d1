//! Discord OAuth handlers.
//!
//! The storefront's server picker: issue an authorization URL, exchange the
//! returned code, and split the user's manageable guilds by whether the
//! selected bot is already there.

mod exchange_code;
mod guild_membership;
mod issue_auth_url;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{DiscordConfig, ServerConfig};
use crate::domain::foundation::non_blank;
use crate::ports::DiscordApiError;

pub use exchange_code::{ExchangeCodeCommand, ExchangeCodeHandler};
pub use guild_membership::{BotPresence, GuildMembershipResolver, DEFAULT_CHECK_TIMEOUT};
pub use issue_auth_url::{IssueAuthUrlCommand, IssueAuthUrlHandler};

/// Scopes requested from the user.
pub const OAUTH_SCOPES: &str = "identify guilds";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    #[error("Discord OAuth not configured.")]
    NotConfigured,

    #[error("Invalid redirect URI configuration")]
    InvalidRedirectUri,

    #[error("Failed to exchange code for token")]
    TokenExchange(#[source] DiscordApiError),

    #[error("Failed to fetch guilds")]
    GuildFetch(#[source] DiscordApiError),
}

/// OAuth application settings shared by both handlers.
#[derive(Debug, Clone)]
pub struct OAuthSettings {
    client_id: Option<String>,
    redirect_uri: Option<String>,
    public_url: String,
    authorize_url: String,
}

impl OAuthSettings {
    pub fn from_config(discord: &DiscordConfig, server: &ServerConfig) -> Self {
        Self {
            client_id: discord.oauth_credentials().map(|(id, _)| id.to_string()),
            redirect_uri: discord
                .redirect_uri
                .clone()
                .filter(|uri| !uri.trim().is_empty()),
            public_url: server.public_url.clone(),
            authorize_url: format!(
                "{}/oauth2/authorize",
                discord.api_base_url.trim_end_matches('/')
            ),
        }
    }

    /// Client ID, present only when both client ID and secret are configured.
    pub fn client_id(&self) -> Result<&str, OAuthError> {
        self.client_id.as_deref().ok_or(OAuthError::NotConfigured)
    }

    /// Redirect URI for this request: the configured override, else the
    /// request origin, else the public site URL. Never ends with `/`.
    pub fn redirect_uri(&self, origin: Option<&str>) -> String {
        self.redirect_uri
            .as_deref()
            .or(non_blank(origin))
            .unwrap_or(&self.public_url)
            .trim_end_matches('/')
            .to_string()
    }
}

/// OAuth `state` payload carrying the selected product.
#[derive(Debug, Default, Serialize, Deserialize)]
struct OAuthState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bot_name: Option<String>,
}

/// Product named by the callback: JSON `state`, else raw `state`, else `bot_name`.
pub fn product_hint(state: Option<&str>, bot_name: Option<&str>) -> Option<String> {
    let from_state = non_blank(state).and_then(|raw| {
        match serde_json::from_str::<OAuthState>(raw) {
            Ok(parsed) => parsed.bot_name.filter(|b| !b.trim().is_empty()),
            Err(_) => Some(raw.to_string()),
        }
    });
    from_state.or_else(|| non_blank(bot_name).map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(redirect: Option<&str>) -> OAuthSettings {
        let discord = DiscordConfig {
            client_id: Some("1393695244976918588".to_string()),
            client_secret: Some("secret".to_string()),
            redirect_uri: redirect.map(str::to_string),
            ..Default::default()
        };
        OAuthSettings::from_config(&discord, &ServerConfig::default())
    }

    #[test]
    fn redirect_precedence_is_config_then_origin_then_public_url() {
        assert_eq!(
            settings(Some("https://shop.example.org/")).redirect_uri(Some("http://localhost:8888")),
            "https://shop.example.org"
        );
        assert_eq!(
            settings(None).redirect_uri(Some("http://localhost:8888/")),
            "http://localhost:8888"
        );
        assert_eq!(settings(None).redirect_uri(None), "https://bots.kojinstudios.com");
    }

    #[test]
    fn client_id_requires_secret() {
        let discord = DiscordConfig {
            client_id: Some("1393695244976918588".to_string()),
            ..Default::default()
        };
        let settings = OAuthSettings::from_config(&discord, &ServerConfig::default());
        assert_eq!(settings.client_id(), Err(OAuthError::NotConfigured));
    }

    #[test]
    fn product_hint_prefers_json_state() {
        assert_eq!(
            product_hint(Some(r#"{"bot_name":"gavel"}"#), Some("tickets")),
            Some("gavel".to_string())
        );
    }

    #[test]
    fn product_hint_takes_raw_state_verbatim() {
        assert_eq!(product_hint(Some("bundle"), None), Some("bundle".to_string()));
    }

    #[test]
    fn product_hint_falls_back_to_query_parameter() {
        assert_eq!(product_hint(Some("{}"), Some("tickets")), Some("tickets".to_string()));
        assert_eq!(product_hint(None, Some("kojinhost")), Some("kojinhost".to_string()));
        assert_eq!(product_hint(None, None), None);
    }
}
