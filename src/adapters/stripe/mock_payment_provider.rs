//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Idempotent charges keyed by idempotency key
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{Charge, ChargeRequest, ChargeStatus, PaymentError, PaymentProvider};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Inject errors
/// mock.set_error(PaymentError::card_declined("Test decline"));
///
/// let result = mock.charge(request).await;
/// ```
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Charges created so far, by idempotency key.
    charges: HashMap<String, Charge>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Error to return on every call.
    persistent_error: Option<PaymentError>,

    /// Every request received, including replays.
    call_log: Vec<ChargeRequest>,
}

impl MockPaymentProvider {
    /// Create a new mock provider that approves every charge.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that declines every charge.
    pub fn declining(message: impl Into<String>) -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().persistent_error =
            Some(PaymentError::card_declined(message).with_provider_code("generic_decline"));
        mock
    }

    /// Set an error to return on the next call only.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Number of distinct charges created.
    pub fn charge_count(&self) -> usize {
        self.inner.lock().unwrap().charges.len()
    }

    /// Number of charge requests received.
    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().call_log.len()
    }

    /// All charge requests received.
    pub fn calls(&self) -> Vec<ChargeRequest> {
        self.inner.lock().unwrap().call_log.clone()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError> {
        let mut state = self.inner.lock().unwrap();
        state.call_log.push(request.clone());

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        if let Some(error) = &state.persistent_error {
            return Err(error.clone());
        }

        if let Some(existing) = state.charges.get(&request.idempotency_key) {
            return Ok(existing.clone());
        }

        let charge = Charge {
            id: format!("ch_mock_{}", state.charges.len() + 1),
            amount: request.amount,
            status: ChargeStatus::Succeeded,
        };
        state
            .charges
            .insert(request.idempotency_key, charge.clone());
        Ok(charge)
    }
}
