//! Stripe API objects carried by lifecycle events or fetched by ID.

use std::collections::HashMap;

use serde::Deserialize;

/// Stripe metadata: string keys to string values.
pub type Metadata = HashMap<String, String>;

/// Metadata key holding the Discord guild ID.
pub const GUILD_ID_KEY: &str = "guild_id";

/// Metadata key holding the product identifier.
pub const BOT_NAME_KEY: &str = "bot_name";

/// Looks up a metadata value, treating blank strings as absent.
pub fn metadata_value<'a>(metadata: &'a Metadata, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

/// A completed Checkout Session.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,

    /// `payment`, `subscription` or `setup`.
    #[serde(default)]
    pub mode: String,

    /// Total in cents.
    #[serde(default)]
    pub amount_total: Option<i64>,

    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default)]
    pub customer_details: Option<CustomerDetails>,

    #[serde(default)]
    pub client_reference_id: Option<String>,

    #[serde(default)]
    pub subscription: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,
}

/// Contact details collected on the hosted checkout page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl CheckoutSession {
    /// One-off payment (donation) rather than a subscription start.
    pub fn is_payment(&self) -> bool {
        self.mode == "payment"
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_details
            .as_ref()
            .and_then(|d| d.email.as_deref())
            .filter(|e| !e.is_empty())
    }
}

/// An invoice from `invoice.*` events.
#[derive(Debug, Clone, Deserialize)]
pub struct Invoice {
    /// Absent on `invoice.upcoming`, where the invoice is not created yet.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default)]
    pub customer_email: Option<String>,

    #[serde(default)]
    subscription: Option<String>,

    /// Newer API versions move the subscription under `parent`.
    #[serde(default)]
    parent: Option<InvoiceParent>,

    #[serde(default)]
    pub amount_paid: i64,

    #[serde(default)]
    pub amount_due: i64,

    #[serde(default)]
    pub period_start: i64,

    #[serde(default)]
    pub period_end: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct InvoiceParent {
    #[serde(default)]
    subscription_details: Option<InvoiceSubscriptionDetails>,
}

#[derive(Debug, Clone, Deserialize)]
struct InvoiceSubscriptionDetails {
    #[serde(default)]
    subscription: Option<String>,
}

impl Invoice {
    /// Subscription this invoice bills, if any.
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription
            .as_deref()
            .or_else(|| {
                self.parent
                    .as_ref()
                    .and_then(|p| p.subscription_details.as_ref())
                    .and_then(|d| d.subscription.as_deref())
            })
            .filter(|s| !s.is_empty())
    }
}

/// A subscription, from `customer.subscription.*` events or fetched by ID.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscription {
    pub id: String,

    #[serde(default)]
    pub customer: Option<String>,

    #[serde(default)]
    pub status: String,

    #[serde(default)]
    pub cancel_at_period_end: bool,

    #[serde(default)]
    pub current_period_end: Option<i64>,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub items: Option<SubscriptionItems>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionItems {
    #[serde(default)]
    pub data: Vec<SubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionItem {
    #[serde(default)]
    pub price: Option<Price>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Price {
    #[serde(default)]
    pub unit_amount: Option<i64>,
    #[serde(default)]
    pub recurring: Option<Recurring>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recurring {
    #[serde(default)]
    pub interval: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    pub fn is_past_due(&self) -> bool {
        self.status == "past_due"
    }

    /// Price of the first subscription item, if present.
    pub fn first_price(&self) -> Option<&Price> {
        self.items
            .as_ref()
            .and_then(|items| items.data.first())
            .and_then(|item| item.price.as_ref())
    }

    /// True when the subscription has at least one item.
    pub fn has_items(&self) -> bool {
        self.items.as_ref().is_some_and(|i| !i.data.is_empty())
    }
}

/// A customer fetched by ID.
#[derive(Debug, Clone, Deserialize)]
pub struct Customer {
    pub id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    /// Deleted customers come back as stubs with `deleted: true`.
    #[serde(default)]
    pub deleted: bool,
}
