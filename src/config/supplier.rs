//! Supplier confirmation configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::inventory::is_http_url;

/// Supplier confirmation endpoint. When absent, bookings are confirmed
/// locally from the payment charge.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SupplierConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
}

impl SupplierConfig {
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(url) = &self.base_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("SUPPLIER__BASE_URL"));
            }
            if self.api_key.as_ref().map_or(true, |k| k.is_empty()) {
                return Err(ValidationError::MissingRequired("SUPPLIER__API_KEY"));
            }
        }
        Ok(())
    }
}
