//! Sellable products and the bots they grant.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::PriceId;

/// A single bot that can be present in a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKey {
    Gavel,
    Tickets,
    Host,
    Intella,
}

impl BotKey {
    /// Key used in metadata and by the bot-management API.
    pub fn as_str(&self) -> &'static str {
        match self {
            BotKey::Gavel => "gavel",
            BotKey::Tickets => "tickets",
            BotKey::Host => "kojinhost",
            BotKey::Intella => "intella",
        }
    }

    /// Display name used in notifications.
    pub fn display_name(&self) -> &'static str {
        match self {
            BotKey::Gavel => "Gavel",
            BotKey::Tickets => "Tickets",
            BotKey::Host => "Host",
            BotKey::Intella => "Intella",
        }
    }
}

impl fmt::Display for BotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feature bullet shown on the product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

impl Feature {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A purchasable (or free) catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Identifier sent by the storefront as `botName`.
    pub id: String,
    pub name: String,
    /// Stripe price; `None` means the product is free.
    pub price_id: Option<PriceId>,
    pub features: Vec<Feature>,
    /// Bots granted by this product. More than one for a bundle.
    pub bots: Vec<BotKey>,
}

impl Product {
    pub fn is_free(&self) -> bool {
        self.price_id.is_none()
    }

    pub fn is_bundle(&self) -> bool {
        self.bots.len() > 1
    }

    /// True when the product grants `bot`.
    pub fn grants(&self, bot: BotKey) -> bool {
        self.bots.contains(&bot)
    }
}
