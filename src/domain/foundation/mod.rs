//! Shared value objects and errors.

mod errors;
mod ids;
mod text;

pub use errors::ValidationError;
pub use ids::{is_valid_guild_id, GuildId, PriceId};
pub use text::{non_blank, truncate_chars};
