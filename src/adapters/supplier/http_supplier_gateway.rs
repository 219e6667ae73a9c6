//! HTTP supplier gateway - confirms paid bookings with a supplier API.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::travel::{BookingSelection, OfferCategory};
use crate::ports::{Charge, SupplierError, SupplierGateway};

/// Configuration for [`HttpSupplierGateway`].
#[derive(Clone)]
pub struct HttpSupplierConfig {
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

impl HttpSupplierConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Supplier gateway backed by a REST booking endpoint.
///
/// Sends `POST {base_url}/v1/bookings` with the idempotency key both in the
/// body and as an `Idempotency-Key` header.
pub struct HttpSupplierGateway {
    config: HttpSupplierConfig,
    client: Client,
}

impl HttpSupplierGateway {
    pub fn new(config: HttpSupplierConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { config, client }
    }

    fn request_body<'a>(
        selection: &'a BookingSelection,
        charge: &'a Charge,
        idempotency_key: &'a str,
    ) -> SupplierBookingRequest<'a> {
        SupplierBookingRequest {
            idempotency_key,
            charge_id: &charge.id,
            customer_id: selection.customer_id().as_str(),
            items: selection
                .offers()
                .iter()
                .map(|offer| SupplierItem {
                    offer_id: &offer.id,
                    category: offer.category,
                    provider: &offer.provider,
                    amount_cents: offer.price.amount_cents(),
                })
                .collect(),
            total_cents: selection.total().amount_cents(),
            currency: selection.total().currency(),
        }
    }
}

#[async_trait]
impl SupplierGateway for HttpSupplierGateway {
    async fn confirm(
        &self,
        selection: &BookingSelection,
        charge: &Charge,
        idempotency_key: &str,
    ) -> Result<String, SupplierError> {
        let response = self
            .client
            .post(format!("{}/v1/bookings", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .header("Idempotency-Key", idempotency_key)
            .json(&Self::request_body(selection, charge, idempotency_key))
            .send()
            .await
            .map_err(|e| SupplierError::Remote(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SupplierError::Remote(e.to_string()))?;

        match status.as_u16() {
            200..=299 => {}
            409 | 422 => return Err(SupplierError::Rejected(body)),
            code => return Err(SupplierError::Remote(format!("status {}: {}", code, body))),
        }

        let parsed: SupplierBookingResponse =
            serde_json::from_str(&body).map_err(|e| SupplierError::Malformed(e.to_string()))?;
        if parsed.confirmation_number.trim().is_empty() {
            return Err(SupplierError::Malformed("empty confirmation number".to_string()));
        }
        Ok(parsed.confirmation_number)
    }
}

#[derive(Debug, Serialize)]
struct SupplierBookingRequest<'a> {
    idempotency_key: &'a str,
    charge_id: &'a str,
    customer_id: &'a str,
    items: Vec<SupplierItem<'a>>,
    total_cents: i64,
    currency: &'a str,
}

#[derive(Debug, Serialize)]
struct SupplierItem<'a> {
    offer_id: &'a str,
    category: OfferCategory,
    provider: &'a str,
    amount_cents: i64,
}

#[derive(Debug, Deserialize)]
struct SupplierBookingResponse {
    confirmation_number: String,
}
