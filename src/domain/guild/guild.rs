//! Discord guilds as seen through a user's OAuth token.

use serde::{Deserialize, Serialize};

/// MANAGE_GUILD permission bit.
pub const MANAGE_GUILD: u64 = 0x20;

const ICON_CDN_BASE: &str = "https://cdn.discordapp.com/icons";

/// A guild entry from `GET /users/@me/guilds`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserGuild {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub owner: bool,
    /// Permission bitfield. Discord serializes it as a decimal string.
    #[serde(default, deserialize_with = "permissions_from_string_or_number")]
    pub permissions: u64,
}

impl UserGuild {
    /// True when the user can manage the guild (and therefore install bots).
    pub fn can_manage(&self) -> bool {
        self.permissions & MANAGE_GUILD == MANAGE_GUILD
    }

    /// Converts to the storefront view with a CDN icon URL.
    pub fn into_guild(self) -> Guild {
        let icon = self
            .icon
            .filter(|hash| !hash.is_empty())
            .map(|hash| format!("{}/{}/{}.png", ICON_CDN_BASE, self.id, hash));
        Guild {
            id: self.id,
            name: self.name,
            icon,
        }
    }
}

/// Guild as returned to the storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
}

/// Keeps guilds the user can manage and converts them for display.
pub fn manageable_guilds(guilds: Vec<UserGuild>) -> Vec<Guild> {
    guilds
        .into_iter()
        .filter(UserGuild::can_manage)
        .map(UserGuild::into_guild)
        .collect()
}

fn permissions_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
