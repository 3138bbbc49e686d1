//! ExchangeCodeHandler - Completes the OAuth flow and partitions the user's guilds.

use std::sync::Arc;

use crate::domain::catalog::Catalog;
use crate::domain::guild::{manageable_guilds, GuildPartition};
use crate::ports::{DiscordApi, DiscordAuth};

use super::{product_hint, BotPresence, GuildMembershipResolver, OAuthError, OAuthSettings};

#[derive(Debug, Clone, Default)]
pub struct ExchangeCodeCommand {
    pub code: String,
    pub state: Option<String>,
    pub bot_name: Option<String>,
    pub origin: Option<String>,
}

pub struct ExchangeCodeHandler {
    discord: Arc<dyn DiscordApi>,
    resolver: Arc<GuildMembershipResolver>,
    catalog: Arc<Catalog>,
    settings: Arc<OAuthSettings>,
}

impl ExchangeCodeHandler {
    pub fn new(
        discord: Arc<dyn DiscordApi>,
        resolver: Arc<GuildMembershipResolver>,
        catalog: Arc<Catalog>,
        settings: Arc<OAuthSettings>,
    ) -> Self {
        Self {
            discord,
            resolver,
            catalog,
            settings,
        }
    }

    pub async fn handle(&self, cmd: ExchangeCodeCommand) -> Result<GuildPartition, OAuthError> {
        self.settings.client_id()?;
        let redirect_uri = self.settings.redirect_uri(cmd.origin.as_deref());
        let hint = product_hint(cmd.state.as_deref(), cmd.bot_name.as_deref());

        let token = self
            .discord
            .exchange_code(&cmd.code, &redirect_uri)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Discord code exchange failed");
                OAuthError::TokenExchange(e)
            })?;

        let guilds = self
            .discord
            .current_user_guilds(&DiscordAuth::Bearer(token.clone()))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Fetching user guilds failed");
                OAuthError::GuildFetch(e)
            })?;

        let manageable = manageable_guilds(guilds);

        let Some(hint) = hint else {
            return Ok(GuildPartition::all_with_bot(manageable));
        };
        let Some(product) = self.catalog.find(&hint) else {
            tracing::warn!(bot_name = %hint, "OAuth state names an unknown product");
            return Ok(GuildPartition::all_with_bot(manageable));
        };

        let presence = self
            .resolver
            .resolve(&manageable, &product.bots, Some(&token))
            .await;

        let partition = match presence {
            BotPresence::Known(ids) if !ids.is_empty() => {
                GuildPartition::split(manageable, |g| ids.contains(&g.id))
            }
            // Every check came back negative or failed; fall back to the full list.
            BotPresence::Known(_) => {
                tracing::warn!(
                    product = %product.id,
                    "Bot found in no manageable guild; listing every manageable guild as installed"
                );
                GuildPartition::all_with_bot(manageable)
            }
            BotPresence::Unknown => {
                tracing::warn!(
                    product = %product.id,
                    "No bot presence strategy available; listing every manageable guild as installed"
                );
                GuildPartition::all_with_bot(manageable)
            }
        };

        tracing::info!(
            product = %product.id,
            with_bot = partition.with_bot.len(),
            others = partition.others.len(),
            "Partitioned guilds for server picker"
        );

        Ok(partition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::adapters::bot_api::MockBotApi;
    use crate::adapters::discord::MockDiscordApi;
    use crate::config::{DiscordConfig, ServerConfig};
    use crate::domain::catalog::BotKey;
    use crate::domain::guild::{UserGuild, MANAGE_GUILD};
    use crate::ports::DiscordApiError;

    const GAVEL_APP: &str = "900000000000000001";

    fn user_guild(id: &str, permissions: u64) -> UserGuild {
        UserGuild {
            id: id.to_string(),
            name: format!("Guild {}", id),
            icon: Some("a1b2c3".to_string()),
            owner: false,
            permissions,
        }
    }

    fn settings() -> Arc<OAuthSettings> {
        let discord = DiscordConfig {
            client_id: Some("1393695244976918588".to_string()),
            client_secret: Some("secret".to_string()),
            ..Default::default()
        };
        Arc::new(OAuthSettings::from_config(&discord, &ServerConfig::default()))
    }

    fn handler(discord: &MockDiscordApi, bot_api: MockBotApi) -> ExchangeCodeHandler {
        let resolver = GuildMembershipResolver::new(
            Arc::new(discord.clone()),
            Arc::new(bot_api),
            HashMap::from([(BotKey::Gavel, GAVEL_APP.to_string())]),
            None,
        );
        ExchangeCodeHandler::new(
            Arc::new(discord.clone()),
            Arc::new(resolver),
            Arc::new(Catalog::standard()),
            settings(),
        )
    }

    fn command(state: Option<&str>) -> ExchangeCodeCommand {
        ExchangeCodeCommand {
            code: "auth-code".to_string(),
            state: state.map(str::to_string),
            bot_name: None,
            origin: Some("https://bots.kojinstudios.com/".to_string()),
        }
    }

    fn ids(guilds: &[crate::domain::guild::Guild]) -> Vec<&str> {
        guilds.iter().map(|g| g.id.as_str()).collect()
    }

    #[tokio::test]
    async fn keeps_only_manageable_guilds_when_no_product() {
        let discord = MockDiscordApi::new().with_user_guilds(vec![
            user_guild("111111111111111111", MANAGE_GUILD),
            user_guild("222222222222222222", 0x8),
        ]);

        let partition = handler(&discord, MockBotApi::unconfigured())
            .handle(command(None))
            .await
            .unwrap();

        assert_eq!(ids(&partition.with_bot), vec!["111111111111111111"]);
        assert!(partition.others.is_empty());
        assert_eq!(
            partition.with_bot[0].icon.as_deref(),
            Some("https://cdn.discordapp.com/icons/111111111111111111/a1b2c3.png")
        );
        assert_eq!(
            discord.calls()[0],
            "exchange_code:auth-code:https://bots.kojinstudios.com"
        );
    }

    #[tokio::test]
    async fn product_in_state_partitions_by_presence() {
        let discord = MockDiscordApi::new()
            .with_user_guilds(vec![
                user_guild("111111111111111111", MANAGE_GUILD),
                user_guild("222222222222222222", MANAGE_GUILD | 0x8),
            ])
            .with_member("222222222222222222", GAVEL_APP);

        let partition = handler(&discord, MockBotApi::unconfigured())
            .handle(command(Some(r#"{"bot_name":"gavel"}"#)))
            .await
            .unwrap();

        assert_eq!(ids(&partition.with_bot), vec!["222222222222222222"]);
        assert_eq!(ids(&partition.others), vec!["111111111111111111"]);
    }

    #[tokio::test]
    async fn no_strategy_lists_every_guild_with_bot() {
        let discord = MockDiscordApi::new().with_user_guilds(vec![
            user_guild("111111111111111111", MANAGE_GUILD),
            user_guild("222222222222222222", MANAGE_GUILD),
        ]);

        let partition = handler(&discord, MockBotApi::unconfigured())
            .handle(command(Some("tickets")))
            .await
            .unwrap();

        assert_eq!(partition.with_bot.len(), 2);
        assert!(partition.others.is_empty());
    }

    #[tokio::test]
    async fn bot_in_no_guild_lists_every_guild_with_bot() {
        let discord = MockDiscordApi::new().with_user_guilds(vec![
            user_guild("111111111111111111", MANAGE_GUILD),
            user_guild("222222222222222222", MANAGE_GUILD),
        ]);

        let partition = handler(&discord, MockBotApi::unconfigured())
            .handle(command(Some(r#"{"bot_name":"gavel"}"#)))
            .await
            .unwrap();

        assert_eq!(
            ids(&partition.with_bot),
            vec!["111111111111111111", "222222222222222222"]
        );
        assert!(partition.others.is_empty());
    }

    #[tokio::test]
    async fn token_exchange_failure_is_surfaced() {
        let discord = MockDiscordApi::new();
        discord.fail_exchange(DiscordApiError::Status {
            status: 400,
            body: "invalid_grant".to_string(),
        });

        let err = handler(&discord, MockBotApi::unconfigured())
            .handle(command(None))
            .await
            .unwrap_err();

        assert!(matches!(err, OAuthError::TokenExchange(_)));
        assert_eq!(err.to_string(), "Failed to exchange code for token");
    }

    #[tokio::test]
    async fn guild_fetch_failure_is_not_an_empty_list() {
        let discord = MockDiscordApi::new();
        discord.fail_user_guilds(DiscordApiError::Status {
            status: 401,
            body: "401: Unauthorized".to_string(),
        });

        let err = handler(&discord, MockBotApi::unconfigured())
            .handle(command(None))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Failed to fetch guilds");
    }
}
