//! HandleStripeWebhookHandler - Verifies Stripe webhooks and reacts to billing lifecycle events.
//!
//! Every event is handled on its own: records are re-fetched by ID, nothing is
//! cached between deliveries, and a replayed event repeats its side effects.
//! Side effects (operator notification, bot-API update) never fail the
//! webhook; their errors are logged and reported in the outcome. Each
//! downstream call is bounded so the acknowledgement beats the request timeout.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::billing::{
    BillingContext, CheckoutSession, Customer, Invoice, LifecycleEvent, StripeWebhookVerifier,
    Subscription, WebhookError,
};
use crate::domain::notification::Embed;
use crate::ports::{
    BotApi, NotificationChannel, NotificationError, Notifier, PaymentProvider, SessionSummary,
    SubscriptionAction, SubscriptionUpdate,
};

use super::embeds;

/// Bound on each record lookup and side effect.
const DEFAULT_DOWNSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Command to handle a Stripe webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header.
    pub signature: Option<String>,
}

/// What happened to one side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    Delivered,
    Failed,
    Skipped,
}

/// Result of a verified delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleOutcome {
    pub kind: &'static str,
    pub notification: SideEffect,
    pub bot_update: SideEffect,
}

impl LifecycleOutcome {
    fn ignored(kind: &'static str) -> Self {
        Self {
            kind,
            notification: SideEffect::Skipped,
            bot_update: SideEffect::Skipped,
        }
    }

    fn notified(kind: &'static str, notification: SideEffect) -> Self {
        Self {
            kind,
            notification,
            bot_update: SideEffect::Skipped,
        }
    }
}

pub struct HandleStripeWebhookHandler {
    verifier: Option<Arc<StripeWebhookVerifier>>,
    payment_provider: Arc<dyn PaymentProvider>,
    notifier: Arc<dyn Notifier>,
    bot_api: Arc<dyn BotApi>,
    source_tag: String,
    downstream_timeout: Duration,
}

impl HandleStripeWebhookHandler {
    pub fn new(
        verifier: Option<Arc<StripeWebhookVerifier>>,
        payment_provider: Arc<dyn PaymentProvider>,
        notifier: Arc<dyn Notifier>,
        bot_api: Arc<dyn BotApi>,
        source_tag: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            payment_provider,
            notifier,
            bot_api,
            source_tag: source_tag.into(),
            downstream_timeout: DEFAULT_DOWNSTREAM_TIMEOUT,
        }
    }

    /// Bound applied to each record lookup, notification and bot update.
    pub fn with_downstream_timeout(mut self, timeout: Duration) -> Self {
        self.downstream_timeout = timeout;
        self
    }

    async fn bounded<T>(&self, call: impl Future<Output = T>) -> Option<T> {
        tokio::time::timeout(self.downstream_timeout, call).await.ok()
    }

    pub async fn handle(
        &self,
        cmd: HandleStripeWebhookCommand,
    ) -> Result<LifecycleOutcome, WebhookError> {
        // 1. Verify before anything else touches the payload
        let verifier = self.verifier.as_ref().ok_or(WebhookError::NotConfigured)?;
        let signature = cmd
            .signature
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;
        let stripe_event = verifier.verify_and_parse(&cmd.payload, signature)?;

        // 2. Narrow to the lifecycle we react to
        let event = LifecycleEvent::from_stripe(&stripe_event)?;
        tracing::info!(
            event_id = %stripe_event.id,
            event_type = %stripe_event.event_type,
            kind = event.kind(),
            "Received Stripe event"
        );

        // 3. Dispatch
        let outcome = match event {
            LifecycleEvent::CheckoutCompleted(session) if session.is_payment() => {
                self.on_donation(&session).await
            }
            LifecycleEvent::CheckoutCompleted(session) => self.on_subscription_started(&session).await,
            LifecycleEvent::InvoicePaid(invoice) => self.on_invoice_paid(&invoice).await,
            LifecycleEvent::SubscriptionCanceled(sub) => self.on_subscription_canceled(&sub).await,
            LifecycleEvent::InvoicePaymentFailed(invoice) => self.on_payment_failed(&invoice).await,
            LifecycleEvent::SubscriptionUpdated(sub) => self.on_subscription_updated(&sub).await,
            LifecycleEvent::InvoiceUpcoming(invoice) => self.on_invoice_upcoming(&invoice).await,
            LifecycleEvent::Unhandled(event_type) => {
                tracing::info!(event_type = %event_type, "Unhandled event type");
                LifecycleOutcome::ignored("unhandled")
            }
        };

        Ok(outcome)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Event handlers
    // ════════════════════════════════════════════════════════════════════════════

    async fn on_donation(&self, session: &CheckoutSession) -> LifecycleOutcome {
        let embed = embeds::donation(session);
        let notification = self.notify(NotificationChannel::Donation, &embed).await;
        LifecycleOutcome::notified("donation", notification)
    }

    async fn on_subscription_started(&self, session: &CheckoutSession) -> LifecycleOutcome {
        let ctx = BillingContext::from_checkout(session);
        let Some(guild_id) = ctx.guild_id.as_deref() else {
            tracing::error!(session_id = %session.id, "No guild ID found in checkout session");
            return LifecycleOutcome::ignored("subscription_started");
        };

        tracing::info!(guild_id, bot_name = ?ctx.bot_name, "Activating subscription");

        let embed = embeds::subscription_status(
            guild_id,
            ctx.bot_name.as_deref(),
            SubscriptionAction::Activated,
            Some(session),
        );
        let update = SubscriptionUpdate {
            server_id: guild_id.to_string(),
            bot_name: ctx.bot_name.clone(),
            action: SubscriptionAction::Activated,
            session: Some(SessionSummary {
                id: session.id.clone(),
                customer: session.customer.clone(),
                subscription: session.subscription.clone(),
                amount_total: session.amount_total,
                customer_email: ctx.customer_email.clone(),
            }),
            source: self.source_tag.clone(),
        };

        self.announce("subscription_started", &embed, &update).await
    }

    async fn on_invoice_paid(&self, invoice: &Invoice) -> LifecycleOutcome {
        let Some(subscription_id) = invoice.subscription_id() else {
            tracing::debug!(invoice_id = ?invoice.id, "Skipping invoice without subscription");
            return LifecycleOutcome::ignored("invoice_paid");
        };

        let (customer, subscription) = self
            .fetch_records(invoice.customer.as_deref(), Some(subscription_id))
            .await;
        let ctx = BillingContext::from_records(
            customer.as_ref(),
            subscription.as_ref(),
            invoice.customer_email.as_deref(),
        );

        let embed = embeds::recurring_payment(invoice, &ctx);
        let notification = self.notify(NotificationChannel::General, &embed).await;
        LifecycleOutcome::notified("invoice_paid", notification)
    }

    async fn on_subscription_canceled(&self, subscription: &Subscription) -> LifecycleOutcome {
        let (customer, _) = self
            .fetch_records(subscription.customer.as_deref(), None)
            .await;
        let ctx = BillingContext::from_records(customer.as_ref(), Some(subscription), None);

        let Some(guild_id) = ctx.guild_id.as_deref() else {
            tracing::info!(subscription_id = %subscription.id, "Canceled subscription has no guild ID");
            return LifecycleOutcome::ignored("subscription_canceled");
        };

        tracing::info!(guild_id, bot_name = ?ctx.bot_name, "Deactivating subscription");

        let embed = embeds::subscription_status(
            guild_id,
            ctx.bot_name.as_deref(),
            SubscriptionAction::Deactivated,
            None,
        );
        let update = SubscriptionUpdate {
            server_id: guild_id.to_string(),
            bot_name: ctx.bot_name.clone(),
            action: SubscriptionAction::Deactivated,
            session: None,
            source: self.source_tag.clone(),
        };

        self.announce("subscription_canceled", &embed, &update).await
    }

    async fn on_payment_failed(&self, invoice: &Invoice) -> LifecycleOutcome {
        let (ctx, subscription) = match invoice.subscription_id() {
            Some(subscription_id) => {
                let (customer, subscription) = self
                    .fetch_records(invoice.customer.as_deref(), Some(subscription_id))
                    .await;
                let ctx = BillingContext::from_records(
                    customer.as_ref(),
                    subscription.as_ref(),
                    invoice.customer_email.as_deref(),
                );
                (ctx, subscription)
            }
            None => (BillingContext::default(), None),
        };

        let embed = embeds::payment_failed(invoice, &ctx, subscription.as_ref());
        let notification = self.notify(NotificationChannel::General, &embed).await;
        LifecycleOutcome::notified("invoice_payment_failed", notification)
    }

    async fn on_subscription_updated(&self, subscription: &Subscription) -> LifecycleOutcome {
        let (customer, _) = self
            .fetch_records(subscription.customer.as_deref(), None)
            .await;
        let ctx = BillingContext::from_records(customer.as_ref(), Some(subscription), None);

        let embed = embeds::subscription_updated(subscription, &ctx);
        let notification = self.notify(NotificationChannel::General, &embed).await;
        LifecycleOutcome::notified("subscription_updated", notification)
    }

    async fn on_invoice_upcoming(&self, invoice: &Invoice) -> LifecycleOutcome {
        let Some(subscription_id) = invoice.subscription_id() else {
            tracing::debug!(invoice_id = ?invoice.id, "Skipping upcoming invoice without subscription");
            return LifecycleOutcome::ignored("invoice_upcoming");
        };

        let (customer, subscription) = self
            .fetch_records(invoice.customer.as_deref(), Some(subscription_id))
            .await;
        let ctx = BillingContext::from_records(
            customer.as_ref(),
            subscription.as_ref(),
            invoice.customer_email.as_deref(),
        );

        let embed = embeds::upcoming_invoice(invoice, &ctx);
        let notification = self.notify(NotificationChannel::General, &embed).await;
        LifecycleOutcome::notified("invoice_upcoming", notification)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Side effects
    // ════════════════════════════════════════════════════════════════════════════

    /// Notification and bot-API update, run concurrently.
    async fn announce(
        &self,
        kind: &'static str,
        embed: &Embed,
        update: &SubscriptionUpdate,
    ) -> LifecycleOutcome {
        let (notification, bot_update) = tokio::join!(
            self.notify(NotificationChannel::General, embed),
            self.update_bots(update)
        );
        LifecycleOutcome {
            kind,
            notification,
            bot_update,
        }
    }

    async fn notify(&self, channel: NotificationChannel, embed: &Embed) -> SideEffect {
        let Some(result) = self.bounded(self.notifier.send(channel, embed)).await else {
            tracing::error!(
                timeout_ms = self.downstream_timeout.as_millis() as u64,
                title = %embed.title,
                "Notification timed out"
            );
            return SideEffect::Failed;
        };

        match result {
            Ok(()) => SideEffect::Delivered,
            Err(NotificationError::NotConfigured(_)) => {
                tracing::debug!(?channel, "No notification webhook configured");
                SideEffect::Skipped
            }
            Err(e) => {
                tracing::error!(error = %e, title = %embed.title, "Notification delivery failed");
                SideEffect::Failed
            }
        }
    }

    async fn update_bots(&self, update: &SubscriptionUpdate) -> SideEffect {
        if !self.bot_api.accepts_updates() {
            tracing::warn!(
                server_id = %update.server_id,
                action = update.action.as_str(),
                "Bot API URL not set or points to a local host; skipping bot update"
            );
            return SideEffect::Skipped;
        }

        let Some(result) = self.bounded(self.bot_api.update_subscription(update)).await else {
            tracing::error!(
                timeout_ms = self.downstream_timeout.as_millis() as u64,
                server_id = %update.server_id,
                action = update.action.as_str(),
                "Bot API update timed out"
            );
            return SideEffect::Failed;
        };

        match result {
            Ok(()) => SideEffect::Delivered,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    server_id = %update.server_id,
                    action = update.action.as_str(),
                    "Bot API update failed"
                );
                SideEffect::Failed
            }
        }
    }

    /// Fetches customer and subscription concurrently. Failures and timeouts
    /// are logged and read as absent.
    async fn fetch_records(
        &self,
        customer_id: Option<&str>,
        subscription_id: Option<&str>,
    ) -> (Option<Customer>, Option<Subscription>) {
        tokio::join!(
            self.lookup_customer(customer_id),
            self.lookup_subscription(subscription_id)
        )
    }

    async fn lookup_customer(&self, id: Option<&str>) -> Option<Customer> {
        let id = id?;
        match self.bounded(self.payment_provider.get_customer(id)).await {
            Some(Ok(customer)) => customer,
            Some(Err(e)) => {
                tracing::warn!(customer_id = id, error = %e, "Customer lookup failed");
                None
            }
            None => {
                tracing::warn!(customer_id = id, "Customer lookup timed out");
                None
            }
        }
    }

    async fn lookup_subscription(&self, id: Option<&str>) -> Option<Subscription> {
        let id = id?;
        match self.bounded(self.payment_provider.get_subscription(id)).await {
            Some(Ok(subscription)) => subscription,
            Some(Err(e)) => {
                tracing::warn!(subscription_id = id, error = %e, "Subscription lookup failed");
                None
            }
            None => {
                tracing::warn!(subscription_id = id, "Subscription lookup timed out");
                None
            }
        }
    }
}
