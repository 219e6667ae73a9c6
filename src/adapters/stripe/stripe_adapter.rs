//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against Stripe's Charges API.
//!
//! # Idempotency
//!
//! Every charge is sent with an `Idempotency-Key` header, so a replayed
//! request returns the original charge instead of charging twice.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::travel::Money;
use crate::ports::{Charge, ChargeRequest, ChargeStatus, PaymentError, PaymentErrorCode, PaymentProvider};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    timeout: Duration,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            config,
            http_client,
        }
    }

    /// Form parameters for a charge. Amounts are in the smallest currency unit.
    fn charge_params(request: &ChargeRequest) -> Vec<(&'static str, String)> {
        vec![
            ("amount", request.amount.amount_cents().to_string()),
            ("currency", request.amount.currency().to_lowercase()),
            ("source", request.payment_token.clone()),
            ("description", request.description.clone()),
        ]
    }

    /// Maps a Stripe error response to a payment error.
    fn map_error(status: u16, body: &str) -> PaymentError {
        let detail = serde_json::from_str::<StripeErrorResponse>(body)
            .map(|r| r.error)
            .unwrap_or_default();
        let message = detail
            .message
            .clone()
            .unwrap_or_else(|| format!("Stripe API error (status {})", status));

        let code = match (status, detail.error_type.as_deref(), detail.code.as_deref()) {
            (401, _, _) => PaymentErrorCode::AuthenticationError,
            (429, _, _) => PaymentErrorCode::RateLimitExceeded,
            (_, Some("idempotency_error"), _) => PaymentErrorCode::IdempotencyConflict,
            (_, _, Some("expired_card")) => PaymentErrorCode::CardExpired,
            (_, _, Some("resource_missing")) | (_, _, Some("token_already_used")) => {
                PaymentErrorCode::InvalidToken
            }
            _ if detail.decline_code.as_deref() == Some("insufficient_funds") => {
                PaymentErrorCode::InsufficientFunds
            }
            (402, _, _) | (_, Some("card_error"), _) => PaymentErrorCode::CardDeclined,
            _ => PaymentErrorCode::ProviderError,
        };

        let error = PaymentError::new(code, message);
        match detail.decline_code.or(detail.code) {
            Some(provider_code) => error.with_provider_code(provider_code),
            None => error,
        }
    }

    fn parse_charge(body: &str) -> Result<Charge, PaymentError> {
        let charge: StripeCharge = serde_json::from_str(body)
            .map_err(|e| PaymentError::invalid_response(format!("Failed to parse Stripe response: {}", e)))?;

        let amount = Money::new(charge.amount, charge.currency)
            .map_err(|e| PaymentError::invalid_response(e.to_string()))?;
        let status = match charge.status.as_str() {
            "succeeded" => ChargeStatus::Succeeded,
            "pending" => ChargeStatus::Pending,
            _ => ChargeStatus::Failed,
        };

        Ok(Charge {
            id: charge.id,
            amount,
            status,
        })
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn charge(&self, request: ChargeRequest) -> Result<Charge, PaymentError> {
        let url = format!("{}/v1/charges", self.config.api_base_url);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(&Self::charge_params(&request))
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !status.is_success() {
            let error = Self::map_error(status.as_u16(), &body);
            tracing::warn!(
                status = status.as_u16(),
                code = %error.code,
                "Stripe charge failed"
            );
            return Err(error);
        }

        let charge = Self::parse_charge(&body)?;
        if charge.status == ChargeStatus::Failed {
            return Err(PaymentError::card_declined("Charge failed")
                .with_provider_code(charge.id));
        }

        tracing::info!(charge_id = %charge.id, "Stripe charge created");
        Ok(charge)
    }
}

// ----- Stripe API Types -----

#[derive(Debug, Deserialize)]
struct StripeCharge {
    id: String,
    amount: i64,
    currency: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorDetail,
}

#[derive(Debug, Default, Deserialize)]
struct StripeErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    code: Option<String>,
    decline_code: Option<String>,
    message: Option<String>,
}
