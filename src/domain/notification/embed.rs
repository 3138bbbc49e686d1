//! Discord embed payloads for operator notifications.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::foundation::truncate_chars;

/// Discord caps embed field values at 1024 characters.
pub const FIELD_VALUE_MAX_CHARS: usize = 1024;

/// Embed accent colors.
pub mod colors {
    pub const GREEN: u32 = 0x00ff00;
    pub const RED: u32 = 0xff0000;
    pub const GOLD: u32 = 0xf1c40f;
    pub const BLUE: u32 = 0x3498db;
    pub const ORANGE: u32 = 0xf39c12;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedFooter {
    pub text: String,
}

/// A single Discord embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    pub fields: Vec<EmbedField>,
    pub timestamp: DateTime<Utc>,
    pub footer: EmbedFooter,
}

impl Embed {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        color: u32,
        footer: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            color,
            fields: Vec::new(),
            timestamp: Utc::now(),
            footer: EmbedFooter {
                text: footer.into(),
            },
        }
    }

    /// Appends a field, truncating its value to Discord's limit.
    pub fn field(mut self, name: impl Into<String>, value: impl AsRef<str>, inline: bool) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: truncate_chars(value.as_ref(), FIELD_VALUE_MAX_CHARS).to_string(),
            inline,
        });
        self
    }

    /// Appends a field only when `value` is present.
    pub fn field_if(self, name: impl Into<String>, value: Option<impl AsRef<str>>, inline: bool) -> Self {
        match value {
            Some(value) => self.field(name, value, inline),
            None => self,
        }
    }

    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Webhook execute body: `{"embeds": [...]}`.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookMessage<'a> {
    pub embeds: [&'a Embed; 1],
}

impl<'a> WebhookMessage<'a> {
    pub fn single(embed: &'a Embed) -> Self {
        Self { embeds: [embed] }
    }
}

/// Formats cents as `$12.34`.
pub fn format_usd(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}
