//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured customers and subscriptions
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::billing::{Customer, Subscription};
use crate::ports::{CheckoutSessionRef, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_customer(customer);
/// mock.fail_checkout(PaymentError::provider("card_declined"));
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    customers: HashMap<String, Customer>,
    subscriptions: HashMap<String, Subscription>,
    checkout_error: Option<PaymentError>,
    lookup_error: Option<PaymentError>,
    checkout_requests: Vec<CreateCheckoutRequest>,
    call_log: Vec<MethodCall>,
    session_counter: u32,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: &'static str,
    pub arg: String,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    pub fn add_customer(&self, customer: Customer) {
        self.state().customers.insert(customer.id.clone(), customer);
    }

    pub fn add_subscription(&self, subscription: Subscription) {
        self.state()
            .subscriptions
            .insert(subscription.id.clone(), subscription);
    }

    /// Make every checkout creation fail with `error`.
    pub fn fail_checkout(&self, error: PaymentError) {
        self.state().checkout_error = Some(error);
    }

    /// Make every customer/subscription lookup fail with `error`.
    pub fn fail_lookups(&self, error: PaymentError) {
        self.state().lookup_error = Some(error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.state().checkout_requests.clone()
    }

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSessionRef, PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: "create_checkout_session",
            arg: request.mode().to_string(),
        });
        if let Some(err) = state.checkout_error.clone() {
            return Err(err);
        }
        state.checkout_requests.push(request);
        state.session_counter += 1;
        let id = format!("cs_test_{}", state.session_counter);
        Ok(CheckoutSessionRef {
            url: Some(format!("https://checkout.stripe.com/c/pay/{}", id)),
            id,
        })
    }

    async fn get_customer(&self, customer_id: &str) -> Result<Option<Customer>, PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: "get_customer",
            arg: customer_id.to_string(),
        });
        if let Some(err) = state.lookup_error.clone() {
            return Err(err);
        }
        Ok(state.customers.get(customer_id).cloned())
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Subscription>, PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: "get_subscription",
            arg: subscription_id.to_string(),
        });
        if let Some(err) = state.lookup_error.clone() {
            return Err(err);
        }
        Ok(state.subscriptions.get(subscription_id).cloned())
    }
}
