//! GuildMembershipResolver - Decides which guilds already have a bot installed.
//!
//! Strategies are tried in a fixed order and the first one available answers
//! for the whole batch:
//!
//! 1. Bot application guild list (client-credentials grant, static bot token
//!    when a configured grant fails)
//! 2. Bot-management API `check-server`, falling back to its server list on a non-2xx
//! 3. Discord member lookup with the user's token, for bots with a known application ID
//!
//! When none is available the result is [`BotPresence::Unknown`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use secrecy::SecretString;

use crate::domain::catalog::BotKey;
use crate::domain::guild::Guild;
use crate::ports::{BotApi, BotApiError, DiscordApi, DiscordApiError, DiscordAuth};

/// Per-guild check budget.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// Outcome of a batch presence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotPresence {
    /// IDs of the guilds where at least one of the bots is present.
    Known(HashSet<String>),
    /// No strategy could run.
    Unknown,
}

impl BotPresence {
    pub fn contains(&self, guild_id: &str) -> Option<bool> {
        match self {
            BotPresence::Known(ids) => Some(ids.contains(guild_id)),
            BotPresence::Unknown => None,
        }
    }
}

enum Strategy<'a> {
    BotGuilds(HashSet<String>),
    BotApi,
    MemberLookup {
        user_token: &'a SecretString,
        application_ids: Vec<&'a str>,
    },
}

impl Strategy<'_> {
    fn name(&self) -> &'static str {
        match self {
            Strategy::BotGuilds(_) => "bot_guilds",
            Strategy::BotApi => "bot_api",
            Strategy::MemberLookup { .. } => "member_lookup",
        }
    }
}

pub struct GuildMembershipResolver {
    discord: Arc<dyn DiscordApi>,
    bot_api: Arc<dyn BotApi>,
    application_ids: HashMap<BotKey, String>,
    bot_token: Option<SecretString>,
    check_timeout: Duration,
}

impl GuildMembershipResolver {
    pub fn new(
        discord: Arc<dyn DiscordApi>,
        bot_api: Arc<dyn BotApi>,
        application_ids: HashMap<BotKey, String>,
        bot_token: Option<SecretString>,
    ) -> Self {
        Self {
            discord,
            bot_api,
            application_ids,
            bot_token,
            check_timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    pub fn with_check_timeout(mut self, timeout: Duration) -> Self {
        self.check_timeout = timeout;
        self
    }

    /// Single-guild check. `None` when no strategy is available.
    pub async fn is_bot_in_guild(
        &self,
        bot: BotKey,
        guild_id: &str,
        user_token: Option<&SecretString>,
    ) -> Option<bool> {
        let guild = Guild {
            id: guild_id.to_string(),
            name: String::new(),
            icon: None,
        };
        self.resolve(std::slice::from_ref(&guild), &[bot], user_token)
            .await
            .contains(guild_id)
    }

    /// Checks every guild concurrently. A guild counts as having the bot when
    /// any of `bots` is present; failed or timed-out checks count as absent.
    pub async fn resolve(
        &self,
        guilds: &[Guild],
        bots: &[BotKey],
        user_token: Option<&SecretString>,
    ) -> BotPresence {
        let Some(strategy) = self.select_strategy(bots, user_token).await else {
            return BotPresence::Unknown;
        };

        tracing::debug!(
            strategy = strategy.name(),
            guilds = guilds.len(),
            "Resolving bot presence"
        );

        let checks = guilds.iter().map(|guild| {
            let strategy = &strategy;
            async move {
                let check = self.any_present(strategy, bots, &guild.id);
                let present = match tokio::time::timeout(self.check_timeout, check).await {
                    Ok(present) => present,
                    Err(_) => {
                        tracing::warn!(guild_id = %guild.id, "Bot presence check timed out");
                        false
                    }
                };
                (guild.id.as_str(), present)
            }
        });

        let present = join_all(checks)
            .await
            .into_iter()
            .filter(|(_, present)| *present)
            .map(|(id, _)| id.to_string())
            .collect();

        BotPresence::Known(present)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Strategy selection
    // ════════════════════════════════════════════════════════════════════════════

    async fn select_strategy<'a>(
        &'a self,
        bots: &[BotKey],
        user_token: Option<&'a SecretString>,
    ) -> Option<Strategy<'a>> {
        if let Some(guild_ids) = self.bot_application_guilds().await {
            return Some(Strategy::BotGuilds(guild_ids));
        }

        if self.bot_api.is_configured() {
            return Some(Strategy::BotApi);
        }

        let application_ids: Vec<&str> = bots
            .iter()
            .filter_map(|bot| self.application_ids.get(bot).map(String::as_str))
            .collect();
        match user_token {
            Some(user_token) if !application_ids.is_empty() => Some(Strategy::MemberLookup {
                user_token,
                application_ids,
            }),
            _ => None,
        }
    }

    /// Guild IDs the bot application occupies. `None` when the list cannot
    /// be fetched or is empty.
    async fn bot_application_guilds(&self) -> Option<HashSet<String>> {
        let listed = match self.discord.bot_client_credentials().await {
            Ok(token) => self
                .discord
                .current_user_guilds(&DiscordAuth::Bearer(token))
                .await,
            Err(DiscordApiError::NotConfigured) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Bot client-credentials grant failed");
                match &self.bot_token {
                    Some(token) => {
                        self.discord
                            .current_user_guilds(&DiscordAuth::Bot(token.clone()))
                            .await
                    }
                    None => return None,
                }
            }
        };

        match listed {
            Ok(guilds) if !guilds.is_empty() => Some(guilds.into_iter().map(|g| g.id).collect()),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Could not list bot guilds");
                None
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Per-guild checks
    // ════════════════════════════════════════════════════════════════════════════

    async fn any_present(&self, strategy: &Strategy<'_>, bots: &[BotKey], guild_id: &str) -> bool {
        match strategy {
            Strategy::BotGuilds(ids) => ids.contains(guild_id),
            Strategy::BotApi => {
                for bot in bots {
                    if self.bot_api_reports(*bot, guild_id).await {
                        return true;
                    }
                }
                false
            }
            Strategy::MemberLookup {
                user_token,
                application_ids,
            } => {
                for application_id in application_ids {
                    match self
                        .discord
                        .guild_member_exists(guild_id, application_id, user_token)
                        .await
                    {
                        Ok(true) => return true,
                        Ok(false) => {}
                        Err(e) => {
                            tracing::debug!(guild_id, error = %e, "Member lookup failed");
                        }
                    }
                }
                false
            }
        }
    }

    async fn bot_api_reports(&self, bot: BotKey, guild_id: &str) -> bool {
        match self.bot_api.check_server(guild_id, bot.as_str()).await {
            Ok(present) => present,
            Err(BotApiError::Status(status)) => {
                tracing::debug!(guild_id, status, "check-server refused; using server list");
                match self.bot_api.list_servers(bot.as_str()).await {
                    Ok(ids) => ids.iter().any(|id| id == guild_id),
                    Err(e) => {
                        tracing::warn!(error = %e, "Could not fetch bot server list");
                        false
                    }
                }
            }
            Err(e) => {
                tracing::debug!(guild_id, error = %e, "Could not check bot membership");
                false
            }
        }
    }
}
