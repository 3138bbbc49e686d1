//! Checkout handlers.
//!
//! Turn storefront form input into hosted Stripe checkout sessions:
//! - Bot subscriptions (catalog price, bound to a Discord guild)
//! - One-time donations (free amount)

mod create_donation_session;
mod create_subscription_session;

use thiserror::Error;

use crate::domain::checkout::CheckoutError;
use crate::ports::PaymentError;

pub use create_donation_session::{CreateDonationSessionCommand, CreateDonationSessionHandler};
pub use create_subscription_session::{
    CreateSubscriptionSessionCommand, CreateSubscriptionSessionHandler,
};

/// Failure to create a checkout session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateSessionError {
    /// Input rejected before contacting the provider.
    #[error(transparent)]
    Invalid(#[from] CheckoutError),

    /// The provider refused or could not be reached.
    #[error("Payment provider error: {0}")]
    Provider(#[from] PaymentError),
}

/// Success and cancel URLs for a hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub success: String,
    pub cancel: String,
}

impl RedirectUrls {
    /// Builds the redirect pair for the storefront at `origin`.
    ///
    /// `{CHECKOUT_SESSION_ID}` is left verbatim for Stripe to fill in.
    pub fn for_origin(origin: &str, donation: bool) -> Self {
        let origin = origin.trim_end_matches('/');
        let mut success = format!("{}/success.html?session_id={{CHECKOUT_SESSION_ID}}", origin);
        if donation {
            success.push_str("&type=donation");
        }
        Self {
            success,
            cancel: format!("{}/?cancelled=true", origin),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_urls_keep_session_placeholder() {
        let urls = RedirectUrls::for_origin("https://bots.kojinstudios.com/", false);
        assert_eq!(
            urls.success,
            "https://bots.kojinstudios.com/success.html?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(urls.cancel, "https://bots.kojinstudios.com/?cancelled=true");
    }

    #[test]
    fn donation_urls_are_tagged() {
        let urls = RedirectUrls::for_origin("http://localhost:8888", true);
        assert!(urls.success.ends_with("&type=donation"));
    }
}
