//! Discord REST API port.
//!
//! Covers the OAuth code exchange and the guild lookups used to decide
//! where a bot is already installed.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

use crate::domain::guild::UserGuild;

/// Credentials for a Discord REST call.
#[derive(Debug)]
pub enum DiscordAuth {
    /// OAuth2 access token (user or client-credentials).
    Bearer(SecretString),
    /// Bot token.
    Bot(SecretString),
}

/// Port for the Discord REST API.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Exchange an authorization code for a user access token.
    ///
    /// `redirect_uri` must equal the one used to start the authorization.
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SecretString, DiscordApiError>;

    /// `GET /users/@me/guilds` for the given credentials.
    async fn current_user_guilds(
        &self,
        auth: &DiscordAuth,
    ) -> Result<Vec<UserGuild>, DiscordApiError>;

    /// Client-credentials grant for the bot application.
    ///
    /// Fails with `NotConfigured` when no bot application credentials are set.
    async fn bot_client_credentials(&self) -> Result<SecretString, DiscordApiError>;

    /// `GET /guilds/{guild}/members/{bot}` using the user's token.
    ///
    /// `Ok(true)` on 2xx and `Ok(false)` on 404; other statuses are errors.
    async fn guild_member_exists(
        &self,
        guild_id: &str,
        member_id: &str,
        user_token: &SecretString,
    ) -> Result<bool, DiscordApiError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscordApiError {
    #[error("Discord credentials not configured")]
    NotConfigured,

    #[error("Discord API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Discord API request failed: {0}")]
    Transport(String),

    #[error("Unexpected Discord API response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discord_api_is_object_safe() {
        fn _accepts_dyn(_api: &dyn DiscordApi) {}
    }

    #[test]
    fn status_error_includes_body() {
        let err = DiscordApiError::Status {
            status: 401,
            body: "invalid_grant".to_string(),
        };
        assert_eq!(err.to_string(), "Discord API returned 401: invalid_grant");
    }
}
