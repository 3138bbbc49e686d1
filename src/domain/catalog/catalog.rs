//! The storefront's product line-up.

use serde::Serialize;

use super::product::{BotKey, Feature, Product};
use crate::domain::foundation::PriceId;

/// Identifier of the multi-bot bundle.
pub const BUNDLE_ID: &str = "bundle";

/// Immutable product catalog, built once at start-up.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The KojinStudios line-up: three paid bots, a bundle of all three and one free bot.
    pub fn standard() -> Self {
        let support = Feature::new(
            "Priority Support",
            "Dedicated support channels with faster response times",
        );

        Self::new(vec![
            Product {
                id: BUNDLE_ID.to_string(),
                name: "Complete Bundle".to_string(),
                price_id: Some(PriceId::from_static("price_1STSPeBV80dUyFnbpl8UTDJa")),
                features: vec![
                    Feature::new(
                        "Gavel - Moderation",
                        "Complete automoderation, case management, and server protection",
                    ),
                    Feature::new(
                        "Tickets - Support",
                        "Unlimited ticket categories, panels, and custom branding",
                    ),
                    Feature::new(
                        "Host - Engagement",
                        "Weather, reaction roles, events, XP & leveling system",
                    ),
                    Feature::new(
                        "Custom Branding",
                        "Fully customize every bot's appearance to match your server",
                    ),
                    Feature::new(
                        "Custom Commands",
                        "Create unique commands and workflows across all bots",
                    ),
                    Feature::new(
                        "Priority Support",
                        "Dedicated support channels with fastest response times",
                    ),
                ],
                bots: vec![BotKey::Gavel, BotKey::Tickets, BotKey::Host],
            },
            Product {
                id: "gavel".to_string(),
                name: "Gavel".to_string(),
                price_id: Some(PriceId::from_static("price_1RqJNHBV80dUyFnbQ70XJRYO")),
                features: vec![
                    Feature::new(
                        "Case Management System",
                        "Comprehensive case tracking for all moderation actions",
                    ),
                    Feature::new(
                        "User Analytics",
                        "Detailed insights on user behavior and server activity",
                    ),
                    Feature::new(
                        "Automod Configuration",
                        "Customizable automod rules tailored to your server",
                    ),
                    Feature::new(
                        "Impersonation Protection",
                        "Advanced detection and prevention of impersonation",
                    ),
                    Feature::new(
                        "Data Export",
                        "Export moderation logs, cases, and analytics data",
                    ),
                    Feature::new(
                        "Custom Branding",
                        "Customize bot appearance and messages with your branding",
                    ),
                    Feature::new(
                        "Custom Commands",
                        "Create custom moderation commands for your team",
                    ),
                    support.clone(),
                ],
                bots: vec![BotKey::Gavel],
            },
            Product {
                id: "tickets".to_string(),
                name: "Tickets".to_string(),
                price_id: Some(PriceId::from_static("price_1RqJMQBV80dUyFnbodXxowjV")),
                features: vec![
                    Feature::new(
                        "Unlimited Categories",
                        "Create unlimited ticket categories for different departments",
                    ),
                    Feature::new(
                        "Unlimited Panels",
                        "Unlimited ticket panels with custom designs",
                    ),
                    Feature::new(
                        "Unlimited Tickets",
                        "Handle as many support requests as needed",
                    ),
                    Feature::new(
                        "Custom Branding",
                        "Customize ticket appearance with your branding",
                    ),
                    Feature::new(
                        "Custom Commands",
                        "Create custom ticket commands for your support team",
                    ),
                    support.clone(),
                ],
                bots: vec![BotKey::Tickets],
            },
            Product {
                id: "kojinhost".to_string(),
                name: "Host".to_string(),
                price_id: Some(PriceId::from_static("price_1RqJMaBV80dUyFnbhCpWxsq8")),
                features: vec![
                    Feature::new(
                        "Weather System",
                        "Real-time weather updates for any location worldwide",
                    ),
                    Feature::new(
                        "Reaction Roles",
                        "Auto-assign roles based on reactions with customization",
                    ),
                    Feature::new(
                        "Event Management",
                        "Create and manage server events with RSVP and reminders",
                    ),
                    Feature::new(
                        "XP & Leveling",
                        "Gamify your server with levels, rewards, and leaderboards",
                    ),
                    Feature::new(
                        "Custom Branding",
                        "Customize bot appearance with your server branding",
                    ),
                    Feature::new(
                        "Custom Commands",
                        "Create custom utility commands for your community",
                    ),
                    support,
                ],
                bots: vec![BotKey::Host],
            },
            Product {
                id: "intella".to_string(),
                name: "Intella".to_string(),
                price_id: None,
                features: vec![
                    Feature::new(
                        "Economic Calendar",
                        "Track economic events with impact levels and timezone handling",
                    ),
                    Feature::new(
                        "Market News Aggregation",
                        "Multi-source news from Yahoo Finance, Finnhub, and NewsAPI",
                    ),
                    Feature::new(
                        "Interactive Dashboard",
                        "Single entry point (/intella) with quick news and event previews",
                    ),
                    Feature::new(
                        "News & Event Alerts",
                        "Subscribe to updates for specific events and news topics",
                    ),
                    Feature::new(
                        "User & Server Configuration",
                        "Per-user settings and server-wide configuration options",
                    ),
                    Feature::new(
                        "Real-time Market Data",
                        "Access trading-related information without leaving Discord",
                    ),
                ],
                bots: vec![BotKey::Intella],
            },
        ])
    }

    /// Looks a product up by its storefront identifier.
    ///
    /// Matching is case-insensitive and `host` is accepted for `kojinhost`.
    pub fn find(&self, id: &str) -> Option<&Product> {
        let id = id.trim().to_ascii_lowercase();
        let id = if id == "host" { "kojinhost" } else { id.as_str() };
        self.products.iter().find(|p| p.id == id)
    }

    /// Looks a product up by its Stripe price.
    pub fn find_by_price(&self, price: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.price_id.as_ref().is_some_and(|id| id.as_str() == price))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
