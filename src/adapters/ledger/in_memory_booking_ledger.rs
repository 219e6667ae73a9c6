//! In-memory booking ledger.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::travel::BookingConfirmation;
use crate::ports::{BookingLedger, LedgerError};

/// Idempotency records held in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingLedger {
    entries: Arc<RwLock<HashMap<String, BookingConfirmation>>>,
}

impl InMemoryBookingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BookingLedger for InMemoryBookingLedger {
    async fn find(&self, idempotency_key: &str) -> Result<Option<BookingConfirmation>, LedgerError> {
        Ok(self.entries.read().await.get(idempotency_key).cloned())
    }

    async fn record(&self, confirmation: &BookingConfirmation) -> Result<(), LedgerError> {
        self.entries
            .write()
            .await
            .entry(confirmation.idempotency_key.clone())
            .or_insert_with(|| confirmation.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::travel::Money;

    fn confirmation(number: &str) -> BookingConfirmation {
        BookingConfirmation {
            confirmation_number: number.to_string(),
            charge_id: "ch_1".to_string(),
            idempotency_key: "key-1".to_string(),
            total: Money::new(100, "USD").unwrap(),
            confirmed_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn find_returns_recorded_confirmation() {
        let ledger = InMemoryBookingLedger::new();
        assert!(ledger.find("key-1").await.unwrap().is_none());

        ledger.record(&confirmation("TRV-1")).await.unwrap();
        let found = ledger.find("key-1").await.unwrap().unwrap();
        assert_eq!(found.confirmation_number, "TRV-1");
    }

    #[tokio::test]
    async fn first_record_wins() {
        let ledger = InMemoryBookingLedger::new();
        ledger.record(&confirmation("TRV-1")).await.unwrap();
        ledger.record(&confirmation("TRV-2")).await.unwrap();

        let found = ledger.find("key-1").await.unwrap().unwrap();
        assert_eq!(found.confirmation_number, "TRV-1");
        assert_eq!(ledger.len().await, 1);
    }
}
