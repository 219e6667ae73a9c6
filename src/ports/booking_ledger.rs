//! Booking Ledger Port - idempotency records for completed bookings.

use async_trait::async_trait;

use crate::domain::travel::{BookingConfirmation, TravelError};

/// Errors from the ledger store
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Ledger storage error: {0}")]
    Storage(String),
}

impl From<LedgerError> for TravelError {
    fn from(err: LedgerError) -> Self {
        TravelError::remote("booking_ledger", err.to_string())
    }
}

/// Port recording which idempotency keys already produced a booking
#[async_trait]
pub trait BookingLedger: Send + Sync {
    /// Confirmation previously recorded under `idempotency_key`.
    async fn find(&self, idempotency_key: &str) -> Result<Option<BookingConfirmation>, LedgerError>;

    /// Records a confirmation. Recording the same key twice keeps the first.
    async fn record(&self, confirmation: &BookingConfirmation) -> Result<(), LedgerError>;
}
