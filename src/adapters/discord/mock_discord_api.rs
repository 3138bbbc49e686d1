//! In-memory `DiscordApi` for tests.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::guild::UserGuild;
use crate::ports::{DiscordApi, DiscordApiError, DiscordAuth};

const USER_TOKEN: &str = "mock-user-token";
const BOT_APP_TOKEN: &str = "mock-bot-app-token";

/// Mock Discord API.
///
/// Tokens returned by [`exchange_code`](DiscordApi::exchange_code) see the
/// configured user guilds; the bot application token and any `Bot` token see
/// the bot's guilds.
#[derive(Clone, Default)]
pub struct MockDiscordApi {
    inner: Arc<Mutex<MockDiscordState>>,
}

#[derive(Default)]
struct MockDiscordState {
    exchange_error: Option<DiscordApiError>,
    guilds_error: Option<DiscordApiError>,
    user_guilds: Vec<UserGuild>,
    bot_application: bool,
    bot_credentials_error: Option<DiscordApiError>,
    bot_guilds: Vec<UserGuild>,
    members: HashSet<(String, String)>,
    member_lookup_error: Option<DiscordApiError>,
    calls: Vec<String>,
}

impl MockDiscordApi {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockDiscordState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn with_user_guilds(self, guilds: Vec<UserGuild>) -> Self {
        self.state().user_guilds = guilds;
        self
    }

    /// Enables the client-credentials grant; the bot occupies `guild_ids`.
    pub fn with_bot_application(self, guild_ids: &[&str]) -> Self {
        {
            let mut state = self.state();
            state.bot_application = true;
            state.bot_guilds = guild_ids.iter().map(|id| bare_guild(id)).collect();
        }
        self
    }

    /// Guilds visible to a static bot token, without enabling the grant.
    pub fn with_bot_token_guilds(self, guild_ids: &[&str]) -> Self {
        self.state().bot_guilds = guild_ids.iter().map(|id| bare_guild(id)).collect();
        self
    }

    pub fn with_member(self, guild_id: &str, member_id: &str) -> Self {
        self.state()
            .members
            .insert((guild_id.to_string(), member_id.to_string()));
        self
    }

    pub fn fail_exchange(&self, error: DiscordApiError) {
        self.state().exchange_error = Some(error);
    }

    pub fn fail_user_guilds(&self, error: DiscordApiError) {
        self.state().guilds_error = Some(error);
    }

    pub fn fail_bot_credentials(&self, error: DiscordApiError) {
        self.state().bot_credentials_error = Some(error);
    }

    pub fn fail_member_lookups(&self, error: DiscordApiError) {
        self.state().member_lookup_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

fn bare_guild(id: &str) -> UserGuild {
    UserGuild {
        id: id.to_string(),
        name: format!("Guild {}", id),
        icon: None,
        owner: false,
        permissions: 0,
    }
}

#[async_trait]
impl DiscordApi for MockDiscordApi {
    async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<SecretString, DiscordApiError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("exchange_code:{}:{}", code, redirect_uri));
        match state.exchange_error.clone() {
            Some(err) => Err(err),
            None => Ok(SecretString::new(USER_TOKEN.to_string())),
        }
    }

    async fn current_user_guilds(
        &self,
        auth: &DiscordAuth,
    ) -> Result<Vec<UserGuild>, DiscordApiError> {
        let mut state = self.state();
        match auth {
            DiscordAuth::Bearer(token) if token.expose_secret() != BOT_APP_TOKEN => {
                state.calls.push("current_user_guilds:user".to_string());
                match state.guilds_error.clone() {
                    Some(err) => Err(err),
                    None => Ok(state.user_guilds.clone()),
                }
            }
            DiscordAuth::Bearer(_) => {
                state.calls.push("current_user_guilds:bot_app".to_string());
                Ok(state.bot_guilds.clone())
            }
            DiscordAuth::Bot(_) => {
                state.calls.push("current_user_guilds:bot_token".to_string());
                Ok(state.bot_guilds.clone())
            }
        }
    }

    async fn bot_client_credentials(&self) -> Result<SecretString, DiscordApiError> {
        let mut state = self.state();
        state.calls.push("bot_client_credentials".to_string());
        if let Some(err) = state.bot_credentials_error.clone() {
            return Err(err);
        }
        if !state.bot_application {
            return Err(DiscordApiError::NotConfigured);
        }
        Ok(SecretString::new(BOT_APP_TOKEN.to_string()))
    }

    async fn guild_member_exists(
        &self,
        guild_id: &str,
        member_id: &str,
        _user_token: &SecretString,
    ) -> Result<bool, DiscordApiError> {
        let mut state = self.state();
        state
            .calls
            .push(format!("guild_member_exists:{}:{}", guild_id, member_id));
        if let Some(err) = state.member_lookup_error.clone() {
            return Err(err);
        }
        Ok(state
            .members
            .contains(&(guild_id.to_string(), member_id.to_string())))
    }
}
