//! Discord REST client.
//!
//! Talks to the OAuth2 token endpoint and the handful of REST routes the
//! storefront needs. Credentials come from [`DiscordConfig`]; any call whose
//! credentials are missing fails with [`DiscordApiError::NotConfigured`]
//! before touching the network.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::DiscordConfig;
use crate::domain::guild::UserGuild;
use crate::ports::{DiscordApi, DiscordApiError, DiscordAuth};

/// Client id and secret of one Discord application.
struct AppCredentials {
    client_id: String,
    client_secret: SecretString,
}

impl AppCredentials {
    fn from_pair(pair: Option<(&str, &str)>) -> Option<Self> {
        pair.map(|(id, secret)| Self {
            client_id: id.to_string(),
            client_secret: SecretString::new(secret.to_string()),
        })
    }
}

pub struct DiscordClient {
    api_base_url: String,
    oauth_app: Option<AppCredentials>,
    bot_app: Option<AppCredentials>,
    http_client: reqwest::Client,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl DiscordClient {
    pub fn from_config(config: &DiscordConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            oauth_app: AppCredentials::from_pair(config.oauth_credentials()),
            bot_app: AppCredentials::from_pair(config.bot_credentials()),
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }

    async fn request_token(
        &self,
        app: &AppCredentials,
        form: &[(&str, &str)],
    ) -> Result<SecretString, DiscordApiError> {
        let response = self
            .http_client
            .post(self.url("/oauth2/token"))
            .basic_auth(&app.client_id, Some(app.client_secret.expose_secret()))
            .form(form)
            .send()
            .await
            .map_err(|e| DiscordApiError::Transport(e.to_string()))?;

        let response = ensure_success(response).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DiscordApiError::InvalidResponse(e.to_string()))?;

        Ok(SecretString::new(token.access_token))
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, DiscordApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(DiscordApiError::Status {
        status: status.as_u16(),
        body,
    })
}

fn authorization(auth: &DiscordAuth) -> String {
    match auth {
        DiscordAuth::Bearer(token) => format!("Bearer {}", token.expose_secret()),
        DiscordAuth::Bot(token) => format!("Bot {}", token.expose_secret()),
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SecretString, DiscordApiError> {
        let app = self
            .oauth_app
            .as_ref()
            .ok_or(DiscordApiError::NotConfigured)?;

        self.request_token(
            app,
            &[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ],
        )
        .await
    }

    async fn current_user_guilds(
        &self,
        auth: &DiscordAuth,
    ) -> Result<Vec<UserGuild>, DiscordApiError> {
        let response = self
            .http_client
            .get(self.url("/users/@me/guilds"))
            .header(reqwest::header::AUTHORIZATION, authorization(auth))
            .send()
            .await
            .map_err(|e| DiscordApiError::Transport(e.to_string()))?;

        ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| DiscordApiError::InvalidResponse(e.to_string()))
    }

    async fn bot_client_credentials(&self) -> Result<SecretString, DiscordApiError> {
        let app = self.bot_app.as_ref().ok_or(DiscordApiError::NotConfigured)?;
        self.request_token(app, &[("grant_type", "client_credentials"), ("scope", "bot")])
            .await
    }

    async fn guild_member_exists(
        &self,
        guild_id: &str,
        member_id: &str,
        user_token: &SecretString,
    ) -> Result<bool, DiscordApiError> {
        let response = self
            .http_client
            .get(self.url(&format!("/guilds/{}/members/{}", guild_id, member_id)))
            .bearer_auth(user_token.expose_secret())
            .send()
            .await
            .map_err(|e| DiscordApiError::Transport(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(false);
        }
        ensure_success(response).await.map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> DiscordConfig {
        DiscordConfig {
            client_id: Some("1393695244976918588".to_string()),
            client_secret: Some("oauth-secret".to_string()),
            api_base_url: "https://discord.com/api/".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = DiscordClient::from_config(&configured());
        assert_eq!(
            client.url("/users/@me/guilds"),
            "https://discord.com/api/users/@me/guilds"
        );
    }

    #[test]
    fn authorization_header_follows_token_kind() {
        let bearer = DiscordAuth::Bearer(SecretString::new("abc".to_string()));
        let bot = DiscordAuth::Bot(SecretString::new("xyz".to_string()));
        assert_eq!(authorization(&bearer), "Bearer abc");
        assert_eq!(authorization(&bot), "Bot xyz");
    }

    #[tokio::test]
    async fn missing_bot_application_is_not_configured() {
        let client = DiscordClient::from_config(&configured());
        let result = client.bot_client_credentials().await;
        assert_eq!(result.unwrap_err(), DiscordApiError::NotConfigured);
    }

    #[tokio::test]
    async fn missing_oauth_application_is_not_configured() {
        let client = DiscordClient::from_config(&DiscordConfig::default());
        let result = client.exchange_code("code", "https://bots.kojinstudios.com").await;
        assert_eq!(result.unwrap_err(), DiscordApiError::NotConfigured);
    }
}
