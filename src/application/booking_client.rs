//! Booking & Notification Client - charges, confirms and notifies.
//!
//! # Idempotency
//!
//! A booking is identified by [`BookingSelection::idempotency_key`]. Calls
//! for the same key are serialized; once a key has a recorded confirmation,
//! later calls return it without touching the payment processor. Charges
//! are never retried, and the key is always forwarded to the processor so
//! it can deduplicate on its side too.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::domain::foundation::Timestamp;
use crate::domain::travel::{BookingConfirmation, BookingSelection, TravelError};
use crate::ports::{
    BookingLedger, ChargeRequest, ChargeStatus, DeliveryStatus, EmailMessage,
    NotificationProvider, PaymentProvider, SupplierGateway,
};

/// Tunables for [`BookingClient`].
#[derive(Debug, Clone)]
pub struct BookingSettings {
    /// Deadline for each remote call.
    pub call_timeout: Duration,
    /// Subject line of confirmation emails.
    pub email_subject: String,
    /// Agency name shown in confirmation emails.
    pub agency_name: String,
}

impl Default for BookingSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(30),
            email_subject: "Your Trip Confirmation".to_string(),
            agency_name: "Your Travel Agency".to_string(),
        }
    }
}

/// Performs the financially sensitive side of the workflow.
pub struct BookingClient {
    payments: Arc<dyn PaymentProvider>,
    suppliers: Arc<dyn SupplierGateway>,
    notifier: Arc<dyn NotificationProvider>,
    ledger: Arc<dyn BookingLedger>,
    settings: BookingSettings,
    in_flight: KeyLocks,
}

type KeyLocks = StdMutex<HashMap<String, Arc<Mutex<()>>>>;

fn key_locks(locks: &KeyLocks) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
    locks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Holds a per-key lock registration and removes it from the map on drop,
/// including when the booking future is dropped mid-call.
struct KeyLease<'a> {
    locks: &'a KeyLocks,
    key: String,
    lock: Arc<Mutex<()>>,
}

impl Drop for KeyLease<'_> {
    fn drop(&mut self) {
        let mut locks = key_locks(self.locks);
        // One reference in the map, one held here
        if Arc::strong_count(&self.lock) <= 2 {
            locks.remove(&self.key);
        }
    }
}

impl BookingClient {
    pub fn new(
        payments: Arc<dyn PaymentProvider>,
        suppliers: Arc<dyn SupplierGateway>,
        notifier: Arc<dyn NotificationProvider>,
        ledger: Arc<dyn BookingLedger>,
        settings: BookingSettings,
    ) -> Self {
        Self {
            payments,
            suppliers,
            notifier,
            ledger,
            settings,
            in_flight: StdMutex::new(HashMap::new()),
        }
    }

    /// Charges the selection and confirms it with suppliers.
    ///
    /// Submitting the same selection twice yields the same confirmation and
    /// a single charge.
    pub async fn process_booking(
        &self,
        selection: &BookingSelection,
    ) -> Result<BookingConfirmation, TravelError> {
        let lease = self.lease(selection.idempotency_key());
        let _guard = lease.lock.lock().await;
        self.book_once(selection, &lease.key).await
    }

    async fn book_once(
        &self,
        selection: &BookingSelection,
        key: &str,
    ) -> Result<BookingConfirmation, TravelError> {
        if let Some(existing) = self.ledger.find(key).await? {
            tracing::info!(
                idempotency_key = %key,
                confirmation_number = %existing.confirmation_number,
                "Booking already processed, returning recorded confirmation"
            );
            return Ok(existing);
        }

        let request = ChargeRequest {
            amount: selection.total().clone(),
            payment_token: selection.payment_token().to_string(),
            description: selection.description(),
            idempotency_key: key.to_string(),
        };

        tracing::debug!(
            customer_id = %selection.customer_id(),
            idempotency_key = %key,
            amount = %request.amount,
            "Charging payment token"
        );
        let charge = match timeout(self.settings.call_timeout, self.payments.charge(request)).await {
            Ok(Ok(charge)) => charge,
            Ok(Err(error)) => {
                let error = TravelError::from(error);
                tracing::warn!(idempotency_key = %key, error = %error, "Charge failed");
                return Err(error);
            }
            Err(_) => return Err(TravelError::timeout("payment", self.settings.call_timeout)),
        };

        match charge.status {
            ChargeStatus::Succeeded => {}
            ChargeStatus::Pending => {
                return Err(TravelError::remote("payment", format!("charge {} is still pending", charge.id)))
            }
            ChargeStatus::Failed => {
                return Err(TravelError::declined("charge failed", None))
            }
        }

        let confirmation_number = match timeout(
            self.settings.call_timeout,
            self.suppliers.confirm(selection, &charge, key),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(TravelError::timeout("supplier", self.settings.call_timeout)),
        };

        let confirmation = BookingConfirmation {
            confirmation_number,
            charge_id: charge.id,
            idempotency_key: key.to_string(),
            total: selection.total().clone(),
            confirmed_at: Timestamp::now(),
        };
        self.ledger.record(&confirmation).await?;

        tracing::info!(
            customer_id = %selection.customer_id(),
            confirmation_number = %confirmation.confirmation_number,
            charge_id = %confirmation.charge_id,
            "Booking confirmed"
        );
        Ok(confirmation)
    }

    /// Sends the booking confirmation email. Never retried.
    pub async fn send_confirmation_email(
        &self,
        recipient: &str,
        selection: &BookingSelection,
        confirmation: &BookingConfirmation,
    ) -> Result<DeliveryStatus, TravelError> {
        let message = EmailMessage {
            to: recipient.to_string(),
            subject: self.settings.email_subject.clone(),
            html_body: render_confirmation_email(&self.settings.agency_name, selection, confirmation),
        };

        let status = match timeout(self.settings.call_timeout, self.notifier.send(message)).await {
            Ok(result) => result?,
            Err(_) => return Err(TravelError::timeout("email", self.settings.call_timeout)),
        };

        tracing::info!(
            confirmation_number = %confirmation.confirmation_number,
            status_code = status.status_code,
            accepted = status.accepted,
            "Confirmation email handed to provider"
        );
        Ok(status)
    }

    fn lease(&self, key: String) -> KeyLease<'_> {
        let lock = key_locks(&self.in_flight).entry(key.clone()).or_default().clone();
        KeyLease {
            locks: &self.in_flight,
            key,
            lock,
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        key_locks(&self.in_flight).len()
    }
}

/// HTML body of the confirmation email.
pub fn render_confirmation_email(
    agency_name: &str,
    selection: &BookingSelection,
    confirmation: &BookingConfirmation,
) -> String {
    let rows: String = selection
        .offers()
        .iter()
        .map(|offer| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(offer.category.as_str()),
                escape_html(&offer.title),
                escape_html(&offer.price.to_string())
            )
        })
        .collect();

    format!(
        "<html><body>\
<h1>Your trip is booked!</h1>\
<p>Confirmation number: <strong>{}</strong></p>\
<table><tr><th>Type</th><th>Item</th><th>Price</th></tr>{}</table>\
<p>Total charged: <strong>{}</strong></p>\
<p>Booked on {}.</p>\
<p>Thank you for travelling with {}.</p>\
</body></html>",
        escape_html(&confirmation.confirmation_number),
        rows,
        escape_html(&confirmation.total.to_string()),
        confirmation.confirmed_at.as_datetime().format("%B %-d, %Y"),
        escape_html(agency_name)
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
