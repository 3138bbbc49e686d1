//! CreateDonationSessionHandler - Starts a hosted checkout for a one-time donation.

use std::sync::Arc;

use crate::domain::checkout::{AmountInput, CheckoutError, Donation};
use crate::ports::{
    BillingAddressCollection, CheckoutLineItem, CheckoutSessionRef, CreateCheckoutRequest,
    PaymentProvider,
};

use super::{CreateSessionError, RedirectUrls};

const DONATION_PRODUCT_NAME: &str = "Donation to KojinStudios";
const DONATION_CURRENCY: &str = "usd";

#[derive(Debug, Clone, Default)]
pub struct CreateDonationSessionCommand {
    pub amount: Option<AmountInput>,
    pub name: Option<String>,
    pub message: Option<String>,
    pub origin: String,
}

pub struct CreateDonationSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    source_tag: String,
}

impl CreateDonationSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, source_tag: impl Into<String>) -> Self {
        Self {
            payment_provider,
            source_tag: source_tag.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateDonationSessionCommand,
    ) -> Result<CheckoutSessionRef, CreateSessionError> {
        // A missing amount reads as zero.
        let amount = cmd
            .amount
            .as_ref()
            .ok_or(CheckoutError::AmountTooSmall)?
            .to_amount()?;
        let donation = Donation::new(amount, cmd.name.as_deref(), cmd.message.as_deref());
        let urls = RedirectUrls::for_origin(&cmd.origin, true);

        let request = CreateCheckoutRequest {
            line_item: CheckoutLineItem::OneTime {
                amount_cents: donation.amount.cents(),
                currency: DONATION_CURRENCY.to_string(),
                product_name: DONATION_PRODUCT_NAME.to_string(),
                description: donation.description(),
            },
            metadata: vec![
                ("donation_type".to_string(), "general".to_string()),
                ("donor_name".to_string(), donation.donor_name.clone()),
                (
                    "donor_message".to_string(),
                    donation.message.clone().unwrap_or_default(),
                ),
                ("source".to_string(), self.source_tag.clone()),
            ],
            subscription_metadata: Vec::new(),
            client_reference_id: None,
            success_url: urls.success,
            cancel_url: urls.cancel,
            billing_address_collection: BillingAddressCollection::Auto,
            automatic_tax: false,
            allow_promotion_codes: true,
        };

        let session = self.payment_provider.create_checkout_session(request).await?;

        tracing::info!(
            session_id = %session.id,
            amount_cents = donation.amount.cents(),
            "Donation checkout session created"
        );

        Ok(session)
    }
}
