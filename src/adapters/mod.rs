//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `stripe` - Checkout sessions and record lookups
//! - `discord` - OAuth, guild lookups and webhook notifications
//! - `bot_api` - External bot-management API
//! - `http` - Axum storefront API

pub mod bot_api;
pub mod discord;
pub mod http;
pub mod stripe;
