//! Checkout validation for subscriptions and donations.

mod donation;
mod errors;
mod purchase_intent;

pub use donation::{
    AmountInput, Donation, DonationAmount, DESCRIPTION_MESSAGE_CHARS, MAX_DONATION_CENTS,
    MIN_DONATION_CENTS,
};
pub use errors::CheckoutError;
pub use purchase_intent::PurchaseIntent;
