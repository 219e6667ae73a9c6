//! Error kinds surfaced by travel operations.

use std::time::Duration;
use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Failure of a travel operation.
///
/// Every port error converts into one of these kinds, so workflow steps
/// only ever reason about this closed set.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TravelError {
    /// Network or authentication failure against a provider.
    #[error("{service} request failed: {message}")]
    RemoteService { service: String, message: String },

    /// The provider answered with data that could not be interpreted.
    #[error("{service} returned a malformed response: {message}")]
    MalformedResponse { service: String, message: String },

    /// The payment processor rejected the charge.
    #[error("Payment declined: {reason}")]
    PaymentDeclined {
        reason: String,
        decline_code: Option<String>,
    },

    /// Required search or booking parameters are missing or invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{service} did not respond within {timeout_ms}ms")]
    Timeout { service: String, timeout_ms: u64 },

    #[error("Operation cancelled")]
    Cancelled,
}

impl TravelError {
    pub fn remote(service: impl Into<String>, message: impl Into<String>) -> Self {
        TravelError::RemoteService {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn malformed(service: impl Into<String>, message: impl Into<String>) -> Self {
        TravelError::MalformedResponse {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn declined(reason: impl Into<String>, decline_code: Option<String>) -> Self {
        TravelError::PaymentDeclined {
            reason: reason.into(),
            decline_code,
        }
    }

    pub fn timeout(service: impl Into<String>, after: Duration) -> Self {
        TravelError::Timeout {
            service: service.into(),
            timeout_ms: after.as_millis() as u64,
        }
    }

    /// Whether repeating the same idempotent request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TravelError::RemoteService { .. } | TravelError::Timeout { .. }
        )
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            TravelError::RemoteService { .. } => "REMOTE_SERVICE_ERROR",
            TravelError::MalformedResponse { .. } => "MALFORMED_RESPONSE",
            TravelError::PaymentDeclined { .. } => "PAYMENT_DECLINED",
            TravelError::Validation(_) => "VALIDATION_FAILED",
            TravelError::Timeout { .. } => "TIMEOUT",
            TravelError::Cancelled => "CANCELLED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_remote_and_timeout_errors_are_retryable() {
        assert!(TravelError::remote("amadeus", "503").is_retryable());
        assert!(TravelError::timeout("amadeus", Duration::from_secs(5)).is_retryable());
        assert!(!TravelError::malformed("amadeus", "bad json").is_retryable());
        assert!(!TravelError::declined("card_declined", None).is_retryable());
        assert!(!TravelError::Cancelled.is_retryable());
        assert!(!TravelError::from(ValidationError::missing_parameter("city")).is_retryable());
    }

    #[test]
    fn timeout_reports_milliseconds() {
        let err = TravelError::timeout("stripe", Duration::from_millis(1500));
        assert_eq!(err.to_string(), "stripe did not respond within 1500ms");
    }

    #[test]
    fn validation_error_is_transparent() {
        let err: TravelError = ValidationError::missing_parameter("destination").into();
        assert_eq!(err.to_string(), "Missing required parameter 'destination'");
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }
}
