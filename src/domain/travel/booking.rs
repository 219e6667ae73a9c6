//! Booking selections and their confirmations.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::foundation::{CustomerId, Timestamp, ValidationError};

use super::{Money, Offer};

/// The offers a customer has chosen to purchase, with the means to pay.
///
/// Construction validates that the selection is non-empty, single-currency
/// and carries a payment token, so a selection always has a well-defined
/// total and idempotency key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSelection {
    customer_id: CustomerId,
    offers: Vec<Offer>,
    payment_token: String,
    customer_email: Option<String>,
    total: Money,
}

impl BookingSelection {
    pub fn new(
        customer_id: CustomerId,
        offers: Vec<Offer>,
        payment_token: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let payment_token = payment_token.into();
        if payment_token.trim().is_empty() {
            return Err(ValidationError::missing_parameter("payment_token"));
        }

        let mut iter = offers.iter();
        let first = iter
            .next()
            .ok_or_else(|| ValidationError::missing_parameter("selected_options"))?;
        let total = iter.try_fold(first.price.clone(), |acc, offer| acc.checked_add(&offer.price))?;

        Ok(Self {
            customer_id,
            offers,
            payment_token,
            customer_email: None,
            total,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = Some(email.into());
        self
    }

    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn payment_token(&self) -> &str {
        &self.payment_token
    }

    pub fn customer_email(&self) -> Option<&str> {
        self.customer_email.as_deref()
    }

    /// Sum of the selected offer prices.
    pub fn total(&self) -> &Money {
        &self.total
    }

    /// Charge description shown on the customer's statement.
    pub fn description(&self) -> String {
        let titles: Vec<&str> = self.offers.iter().map(|o| o.title.as_str()).collect();
        format!("Travel booking - {}", titles.join(", "))
    }

    /// Deterministic key identifying this purchase.
    ///
    /// Hex SHA-256 of the customer, the sorted offer ids, the total and the
    /// payment token. Offer order and the notification address do not
    /// affect the key.
    pub fn idempotency_key(&self) -> String {
        let mut ids: Vec<&str> = self.offers.iter().map(|o| o.id.as_str()).collect();
        ids.sort_unstable();

        let mut hasher = Sha256::new();
        hasher.update(self.customer_id.as_str().as_bytes());
        hasher.update([0u8]);
        for id in ids {
            hasher.update(id.as_bytes());
            hasher.update([0u8]);
        }
        hasher.update(self.total.amount_cents().to_be_bytes());
        hasher.update(self.total.currency().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.payment_token.as_bytes());

        format!("{:x}", hasher.finalize())
    }
}

/// Result of a successful charge followed by supplier confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub confirmation_number: String,
    pub charge_id: String,
    pub idempotency_key: String,
    pub total: Money,
    pub confirmed_at: Timestamp,
}

/// A completed booking as remembered in the customer profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    pub confirmation_number: String,
    pub offers: Vec<Offer>,
    pub total: Money,
    pub booked_at: Timestamp,
}

impl BookingRecord {
    pub fn from_booking(selection: &BookingSelection, confirmation: &BookingConfirmation) -> Self {
        Self {
            confirmation_number: confirmation.confirmation_number.clone(),
            offers: selection.offers().to_vec(),
            total: confirmation.total.clone(),
            booked_at: confirmation.confirmed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::travel::OfferCategory;

    fn customer() -> CustomerId {
        CustomerId::new("cust-1").unwrap()
    }

    fn offer(id: &str, cents: i64, currency: &str) -> Offer {
        Offer::new(
            id,
            OfferCategory::Flight,
            "amadeus",
            format!("Offer {}", id),
            Money::new(cents, currency).unwrap(),
        )
    }

    #[test]
    fn selection_requires_offers() {
        let result = BookingSelection::new(customer(), vec![], "tok_visa");
        assert_eq!(
            result.unwrap_err(),
            ValidationError::missing_parameter("selected_options")
        );
    }

    #[test]
    fn selection_requires_payment_token() {
        let result = BookingSelection::new(customer(), vec![offer("A", 100, "USD")], "  ");
        assert_eq!(
            result.unwrap_err(),
            ValidationError::missing_parameter("payment_token")
        );
    }

    #[test]
    fn selection_rejects_mixed_currencies() {
        let result = BookingSelection::new(
            customer(),
            vec![offer("A", 100, "USD"), offer("B", 100, "EUR")],
            "tok_visa",
        );
        assert!(result.is_err());
    }

    #[test]
    fn selection_totals_offer_prices() {
        let selection = BookingSelection::new(
            customer(),
            vec![offer("A", 85000, "USD"), offer("B", 42050, "USD")],
            "tok_visa",
        )
        .unwrap();
        assert_eq!(selection.total().amount_cents(), 127050);
    }

    #[test]
    fn idempotency_key_ignores_offer_order_and_email() {
        let a = BookingSelection::new(
            customer(),
            vec![offer("A", 100, "USD"), offer("B", 200, "USD")],
            "tok_visa",
        )
        .unwrap();
        let b = BookingSelection::new(
            customer(),
            vec![offer("B", 200, "USD"), offer("A", 100, "USD")],
            "tok_visa",
        )
        .unwrap()
        .with_email("traveler@example.com");

        assert_eq!(a.idempotency_key(), b.idempotency_key());
        assert_eq!(a.idempotency_key().len(), 64);
    }

    #[test]
    fn idempotency_key_changes_with_selection() {
        let a = BookingSelection::new(customer(), vec![offer("A", 100, "USD")], "tok_visa").unwrap();
        let b = BookingSelection::new(customer(), vec![offer("B", 100, "USD")], "tok_visa").unwrap();
        let c = BookingSelection::new(customer(), vec![offer("A", 100, "USD")], "tok_amex").unwrap();

        assert_ne!(a.idempotency_key(), b.idempotency_key());
        assert_ne!(a.idempotency_key(), c.idempotency_key());
    }

    #[test]
    fn description_lists_offer_titles() {
        let selection = BookingSelection::new(
            customer(),
            vec![offer("A", 100, "USD"), offer("B", 100, "USD")],
            "tok_visa",
        )
        .unwrap();
        assert_eq!(selection.description(), "Travel booking - Offer A, Offer B");
    }
}
