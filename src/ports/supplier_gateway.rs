//! Supplier Gateway Port - confirms inventory holds after payment.

use async_trait::async_trait;

use crate::domain::travel::{BookingSelection, TravelError};

use super::Charge;

/// Errors returned by supplier confirmation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SupplierError {
    #[error("supplier request failed: {0}")]
    Remote(String),

    #[error("supplier rejected the booking: {0}")]
    Rejected(String),

    #[error("supplier returned a malformed response: {0}")]
    Malformed(String),
}

impl From<SupplierError> for TravelError {
    fn from(err: SupplierError) -> Self {
        match err {
            SupplierError::Malformed(message) => TravelError::malformed("supplier", message),
            other => TravelError::remote("supplier", other.to_string()),
        }
    }
}

/// Port for confirming selected offers with their suppliers
#[async_trait]
pub trait SupplierGateway: Send + Sync {
    /// Confirms every offer in the selection against a completed charge.
    ///
    /// Returns the booking confirmation number. Implementations must treat a
    /// repeated call with the same idempotency key as the same booking.
    async fn confirm(
        &self,
        selection: &BookingSelection,
        charge: &Charge,
        idempotency_key: &str,
    ) -> Result<String, SupplierError>;
}
