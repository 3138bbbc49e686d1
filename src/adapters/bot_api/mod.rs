//! Bot-management API adapters.
//!
//! # Configuration
//!
//! - `STOREFRONT__BOT_API__BASE_URL`: API base; lookups use `/check-server` and `/servers`
//! - `STOREFRONT__BOT_API__API_KEY`: sent as `X-API-Key` on updates
//! - `STOREFRONT__BOT_API__TIMEOUT_SECS`: lookup timeout (default 3)

mod http_bot_api;
mod mock_bot_api;

pub use http_bot_api::HttpBotApi;
pub use mock_bot_api::MockBotApi;
