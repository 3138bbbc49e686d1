//! One-off donations.

use crate::domain::foundation::{non_blank, truncate_chars, ValidationError};

use super::errors::CheckoutError;

/// Smallest accepted donation in cents ($0.50).
pub const MIN_DONATION_CENTS: i64 = 50;

/// Largest accepted donation in cents ($100,000).
pub const MAX_DONATION_CENTS: i64 = 10_000_000;

/// Characters of the donor message kept in the checkout description.
pub const DESCRIPTION_MESSAGE_CHARS: usize = 100;

const ANONYMOUS: &str = "Anonymous";
const DEFAULT_DESCRIPTION: &str = "Thank you for supporting KojinStudios!";

/// Donation amount in minor units (cents), within the accepted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DonationAmount(i64);

impl DonationAmount {
    /// Converts a decimal dollar amount to cents, rounding half up.
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::invalid_format(
                "amount",
                "amount must be a number",
            ));
        }
        let cents = (amount * 100.0).round();
        // saturating cast keeps huge inputs out of range instead of wrapping
        Self::from_cents(cents as i64)
    }

    /// Parses a decimal string such as `"12.50"` or `"$5"`.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let amount: f64 = trimmed.parse().map_err(|_| {
            ValidationError::invalid_format("amount", "amount must be a number")
        })?;
        Self::from_decimal(amount)
    }

    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if !(MIN_DONATION_CENTS..=MAX_DONATION_CENTS).contains(&cents) {
            return Err(ValidationError::out_of_range(
                "amount",
                MIN_DONATION_CENTS,
                MAX_DONATION_CENTS,
                cents,
            ));
        }
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

/// A validated donation ready for checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Donation {
    pub amount: DonationAmount,
    pub donor_name: String,
    pub message: Option<String>,
}

impl Donation {
    pub fn new(
        amount: DonationAmount,
        donor_name: Option<&str>,
        message: Option<&str>,
    ) -> Self {
        Self {
            amount,
            donor_name: non_blank(donor_name).unwrap_or(ANONYMOUS).to_string(),
            message: non_blank(message).map(str::to_string),
        }
    }

    /// Product description shown on the hosted checkout page.
    pub fn description(&self) -> String {
        match &self.message {
            Some(message) => format!(
                "Donation: {}",
                truncate_chars(message, DESCRIPTION_MESSAGE_CHARS)
            ),
            None => DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

/// Raw donation amount as sent by the storefront: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    pub fn to_amount(&self) -> Result<DonationAmount, CheckoutError> {
        let amount = match self {
            AmountInput::Number(n) => DonationAmount::from_decimal(*n),
            AmountInput::Text(s) => DonationAmount::parse(s),
        };
        amount.map_err(CheckoutError::from)
    }
}
