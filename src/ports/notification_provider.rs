//! Notification Provider Port - delivers booking emails.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::travel::TravelError;

/// An email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// HTML body.
    pub html_body: String,
}

/// Outcome reported by the email provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStatus {
    /// Provider HTTP status code.
    pub status_code: u16,
    /// Whether the provider accepted the message for delivery.
    pub accepted: bool,
}

impl DeliveryStatus {
    pub fn from_status(status_code: u16) -> Self {
        Self {
            status_code,
            accepted: (200..300).contains(&status_code),
        }
    }
}

/// Errors that prevent handing a message to the provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotificationError {
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("email provider request failed: {0}")]
    Remote(String),
}

impl From<NotificationError> for TravelError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::InvalidRecipient(address) => {
                crate::domain::foundation::ValidationError::invalid_format("customer_email", address)
                    .into()
            }
            NotificationError::Remote(message) => TravelError::remote("email", message),
        }
    }
}

/// Port for outbound email
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Hands a message to the provider. No retry is attempted.
    async fn send(&self, message: EmailMessage) -> Result<DeliveryStatus, NotificationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_status_accepts_2xx() {
        assert!(DeliveryStatus::from_status(202).accepted);
        assert!(!DeliveryStatus::from_status(400).accepted);
    }
}
