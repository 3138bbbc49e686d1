//! Operator notifications.

mod embed;

pub use embed::{colors, format_usd, Embed, EmbedField, EmbedFooter, WebhookMessage, FIELD_VALUE_MAX_CHARS};
