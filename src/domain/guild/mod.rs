//! Discord guilds and bot-presence partitioning.

#[allow(clippy::module_inception)]
mod guild;
mod partition;

pub use guild::{manageable_guilds, Guild, UserGuild, MANAGE_GUILD};
pub use partition::GuildPartition;
