//! Strongly-typed identifiers for Discord and Stripe entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

const GUILD_ID_MIN_DIGITS: usize = 17;
const GUILD_ID_MAX_DIGITS: usize = 19;

/// Returns true iff `s` is a 17-19 digit ASCII numeric string.
pub fn is_valid_guild_id(s: &str) -> bool {
    (GUILD_ID_MIN_DIGITS..=GUILD_ID_MAX_DIGITS).contains(&s.len())
        && s.bytes().all(|b| b.is_ascii_digit())
}

/// Discord guild (server) snowflake.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GuildId(String);

impl GuildId {
    /// Creates a GuildId, rejecting anything that is not a 17-19 digit snowflake.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("guild_id"));
        }
        if !is_valid_guild_id(&id) {
            return Err(ValidationError::invalid_format(
                "guild_id",
                "Discord Guild IDs must be 17-19 digits",
            ));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GuildId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for GuildId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GuildId> for String {
    fn from(id: GuildId) -> Self {
        id.0
    }
}

/// Stripe price reference (`price_...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceId(String);

impl PriceId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("price_id"));
        }
        Ok(Self(id))
    }

    /// Builds a price reference from a compile-time constant.
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PriceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_eighteen_digit_snowflake() {
        let id = GuildId::new("123456789012345678").unwrap();
        assert_eq!(id.as_str(), "123456789012345678");
    }

    #[test]
    fn accepts_boundary_lengths() {
        assert!(GuildId::new("1".repeat(17)).is_ok());
        assert!(GuildId::new("1".repeat(19)).is_ok());
    }

    #[test]
    fn rejects_twenty_digits() {
        assert!(GuildId::new("12345678901234567890").is_err());
    }

    #[test]
    fn rejects_sixteen_digits() {
        assert!(GuildId::new("1234567890123456").is_err());
    }

    #[test]
    fn rejects_embedded_letters() {
        let result = GuildId::new("12345abc678901234");
        assert!(matches!(result, Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            GuildId::new(""),
            Err(ValidationError::EmptyField { .. })
        ));
    }

    #[test]
    fn rejects_non_ascii_digits() {
        // Arabic-Indic digits are numeric but not ASCII
        assert!(!is_valid_guild_id("١٢٣٤٥٦٧٨٩٠١٢٣٤٥٦٧٨"));
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Result<GuildId, _> = serde_json::from_str("\"223344556677889900\"");
        assert!(ok.is_ok());
        let bad: Result<GuildId, _> = serde_json::from_str("\"guild\"");
        assert!(bad.is_err());
    }

    #[test]
    fn price_id_rejects_blank() {
        assert!(PriceId::new("  ").is_err());
        assert_eq!(PriceId::new("price_1").unwrap().as_str(), "price_1");
    }

    proptest! {
        #[test]
        fn digit_strings_valid_iff_length_in_range(s in "[0-9]{1,25}") {
            let expected = (17..=19).contains(&s.len());
            prop_assert_eq!(is_valid_guild_id(&s), expected);
        }

        #[test]
        fn any_non_digit_char_invalidates(
            prefix in "[0-9]{8}",
            bad in "[^0-9]",
            suffix in "[0-9]{8}",
        ) {
            let candidate = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(!is_valid_guild_id(&candidate));
        }
    }
}
