//! Payment provider port for charging customers.
//!
//! # Design
//!
//! - **Gateway agnostic**: Interface works with any payment processor
//! - **Idempotent**: Every charge carries an idempotency key; processors
//!   must return the original charge when a key is replayed
//! - **Never retried blindly**: callers do not retry charges on error

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::travel::{Money, TravelError};

const SERVICE: &str = "payment";

/// Port for payment processor integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Charge a payment token.
    ///
    /// Replaying a request with the same idempotency key must not create a
    /// second charge.
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError>;
}

/// Request to charge a payment token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub amount: Money,
    /// Tokenized payment source (never raw card data).
    pub payment_token: String,
    /// Statement description.
    pub description: String,
    pub idempotency_key: String,
}

/// A charge created by the processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Charge {
    /// Provider's charge ID.
    pub id: String,
    pub amount: Money,
    pub status: ChargeStatus,
}

/// Charge status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStatus {
    Succeeded,
    Pending,
    Failed,
}

/// Payment operation error.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn card_declined(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::CardDeclined, message)
    }

    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidToken, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for TravelError {
    fn from(err: PaymentError) -> Self {
        if err.code.is_decline() {
            let code = err.provider_code.unwrap_or_else(|| err.code.to_string());
            return TravelError::declined(err.message, Some(code));
        }
        match err.code {
            PaymentErrorCode::InvalidResponse => TravelError::malformed(SERVICE, err.message),
            _ => TravelError::remote(SERVICE, err.to_string()),
        }
    }
}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    NetworkError,
    AuthenticationError,
    CardDeclined,
    InsufficientFunds,
    CardExpired,
    /// The payment token is unknown or already consumed.
    InvalidToken,
    RateLimitExceeded,
    /// The idempotency key was reused with different parameters.
    IdempotencyConflict,
    /// The processor's response could not be parsed.
    InvalidResponse,
    ProviderError,
    Unknown,
}

impl PaymentErrorCode {
    /// Whether the processor refused the charge itself, as opposed to
    /// failing to process it.
    pub fn is_decline(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::CardDeclined
                | PaymentErrorCode::InsufficientFunds
                | PaymentErrorCode::CardExpired
                | PaymentErrorCode::InvalidToken
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardDeclined => "card_declined",
            PaymentErrorCode::InsufficientFunds => "insufficient_funds",
            PaymentErrorCode::CardExpired => "card_expired",
            PaymentErrorCode::InvalidToken => "invalid_token",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::IdempotencyConflict => "idempotency_conflict",
            PaymentErrorCode::InvalidResponse => "invalid_response",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn declines_become_payment_declined() {
        let err: TravelError = PaymentError::card_declined("Your card was declined")
            .with_provider_code("generic_decline")
            .into();
        assert_eq!(
            err,
            TravelError::declined("Your card was declined", Some("generic_decline".to_string()))
        );
    }

    #[test]
    fn invalid_token_is_a_decline() {
        let err: TravelError = PaymentError::invalid_token("No such token").into();
        assert!(matches!(err, TravelError::PaymentDeclined { .. }));
    }

    #[test]
    fn network_errors_become_remote_service_errors() {
        let err: TravelError = PaymentError::network("connection reset").into();
        assert!(matches!(err, TravelError::RemoteService { .. }));
    }

    #[test]
    fn error_display_includes_code() {
        let err = PaymentError::authentication("bad key");
        assert_eq!(err.to_string(), "authentication_error: bad key");
    }
}
