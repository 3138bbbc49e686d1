//! Checkout validation errors.
//!
//! The display strings are shown to shoppers verbatim.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Missing required fields: priceId, guildId, and botName are required")]
    MissingFields,

    #[error("Invalid Guild ID format. Discord Guild IDs must be 17-19 digits.")]
    InvalidGuildId,

    #[error("Unknown bot: {0}")]
    UnknownProduct(String),

    #[error("{0} is free and does not require a subscription")]
    FreeProduct(String),

    #[error("Price does not match the selected bot")]
    PriceMismatch,

    #[error("Invalid amount. Please enter a valid donation amount")]
    InvalidAmount,

    #[error("Invalid amount. Minimum donation is $0.50")]
    AmountTooSmall,

    #[error("Amount too large. Maximum donation is $100,000")]
    AmountTooLarge,
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        match err.field() {
            "guild_id" => CheckoutError::InvalidGuildId,
            "amount" => match err {
                ValidationError::OutOfRange { actual, min, .. } if actual < min => {
                    CheckoutError::AmountTooSmall
                }
                ValidationError::OutOfRange { .. } => CheckoutError::AmountTooLarge,
                _ => CheckoutError::InvalidAmount,
            },
            _ => CheckoutError::MissingFields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guild_validation_maps_to_invalid_guild() {
        let err = ValidationError::invalid_format("guild_id", "bad");
        assert_eq!(CheckoutError::from(err), CheckoutError::InvalidGuildId);
    }

    #[test]
    fn amount_below_range_maps_to_too_small() {
        let err = ValidationError::out_of_range("amount", 50, 10_000_000, 49);
        assert_eq!(CheckoutError::from(err), CheckoutError::AmountTooSmall);
    }

    #[test]
    fn amount_above_range_maps_to_too_large() {
        let err = ValidationError::out_of_range("amount", 50, 10_000_000, 10_000_001);
        assert_eq!(CheckoutError::from(err), CheckoutError::AmountTooLarge);
    }

    #[test]
    fn messages_match_storefront_copy() {
        assert_eq!(
            CheckoutError::InvalidGuildId.to_string(),
            "Invalid Guild ID format. Discord Guild IDs must be 17-19 digits."
        );
        assert_eq!(
            CheckoutError::AmountTooSmall.to_string(),
            "Invalid amount. Minimum donation is $0.50"
        );
    }
}
