//! Local supplier gateway - issues confirmation numbers without a remote call.
//!
//! Used when no supplier API is configured, and in tests. Confirmation
//! numbers derive from the idempotency key, so a replayed booking yields the
//! same number.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::travel::BookingSelection;
use crate::ports::{Charge, SupplierError, SupplierGateway};

/// Supplier gateway that confirms locally.
#[derive(Clone, Default)]
pub struct LocalSupplierGateway {
    inner: Arc<Mutex<LocalState>>,
}

#[derive(Default)]
struct LocalState {
    confirmations: HashMap<String, String>,
    rejection: Option<String>,
    calls: usize,
}

impl LocalSupplierGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects every booking with the given reason.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        let gateway = Self::new();
        gateway.state().rejection = Some(reason.into());
        gateway
    }

    /// Number of distinct bookings confirmed.
    pub fn confirmation_count(&self) -> usize {
        self.state().confirmations.len()
    }

    /// Number of confirm calls received.
    pub fn call_count(&self) -> usize {
        self.state().calls
    }

    fn state(&self) -> MutexGuard<'_, LocalState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Confirmation number for an idempotency key: `TRV-` plus the first
    /// ten key characters, uppercased.
    pub fn confirmation_number_for(idempotency_key: &str) -> String {
        let prefix: String = idempotency_key.chars().take(10).collect();
        format!("TRV-{}", prefix.to_uppercase())
    }
}

#[async_trait]
impl SupplierGateway for LocalSupplierGateway {
    async fn confirm(
        &self,
        selection: &BookingSelection,
        charge: &Charge,
        idempotency_key: &str,
    ) -> Result<String, SupplierError> {
        let mut state = self.state();
        state.calls += 1;

        if let Some(reason) = &state.rejection {
            return Err(SupplierError::Rejected(reason.clone()));
        }

        let number = state
            .confirmations
            .entry(idempotency_key.to_string())
            .or_insert_with(|| Self::confirmation_number_for(idempotency_key))
            .clone();

        tracing::debug!(
            customer_id = %selection.customer_id(),
            charge_id = %charge.id,
            confirmation_number = %number,
            "Booking confirmed locally"
        );
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::CustomerId;
    use crate::domain::travel::{Money, Offer, OfferCategory};
    use crate::ports::ChargeStatus;

    fn fixture() -> (BookingSelection, Charge) {
        let offer = Offer::new("FL-1", OfferCategory::Flight, "amadeus", "UA", Money::new(100, "USD").unwrap());
        let selection =
            BookingSelection::new(CustomerId::new("cust-1").unwrap(), vec![offer], "tok").unwrap();
        let charge = Charge {
            id: "ch_1".to_string(),
            amount: selection.total().clone(),
            status: ChargeStatus::Succeeded,
        };
        (selection, charge)
    }

    #[test]
    fn confirmation_number_uses_key_prefix() {
        assert_eq!(
            LocalSupplierGateway::confirmation_number_for("abcdef0123456789"),
            "TRV-ABCDEF0123"
        );
    }

    #[tokio::test]
    async fn same_key_yields_same_confirmation() {
        let gateway = LocalSupplierGateway::new();
        let (selection, charge) = fixture();

        let first = gateway.confirm(&selection, &charge, "key-1").await.unwrap();
        let second = gateway.confirm(&selection, &charge, "key-1").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(gateway.confirmation_count(), 1);
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn rejecting_gateway_rejects() {
        let gateway = LocalSupplierGateway::rejecting("sold out");
        let (selection, charge) = fixture();

        let err = gateway.confirm(&selection, &charge, "key-1").await.unwrap_err();
        assert_eq!(err, SupplierError::Rejected("sold out".to_string()));
    }
}
