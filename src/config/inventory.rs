//! Travel inventory provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Flight, hotel and activity search configuration
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryConfig {
    /// Flight offers API base URL (Amadeus)
    #[serde(default = "default_flights_url")]
    pub flights_base_url: String,

    /// Flight offers API bearer token
    pub flights_api_key: Option<String>,

    /// Hotel search API base URL (Booking.com)
    #[serde(default = "default_hotels_url")]
    pub hotels_base_url: String,

    /// Hotel search API key
    pub hotels_api_key: Option<String>,

    /// Activities API base URL
    pub activities_base_url: Option<String>,

    /// Activities API key
    pub activities_api_key: Option<String>,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Retries after the first attempt for retryable failures
    #[serde(default = "default_retries")]
    pub max_retries: u32,

    /// Backoff before the first retry, doubled for each further retry
    #[serde(default = "default_backoff")]
    pub retry_backoff_ms: u64,
}

impl InventoryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    pub fn has_flights(&self) -> bool {
        self.flights_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_hotels(&self) -> bool {
        self.hotels_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    pub fn has_activities(&self) -> bool {
        self.activities_base_url.is_some()
            && self.activities_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate inventory configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_http_url(&self.flights_base_url) {
            return Err(ValidationError::InvalidUrl("INVENTORY__FLIGHTS_BASE_URL"));
        }
        if !is_http_url(&self.hotels_base_url) {
            return Err(ValidationError::InvalidUrl("INVENTORY__HOTELS_BASE_URL"));
        }
        if let Some(url) = &self.activities_base_url {
            if !is_http_url(url) {
                return Err(ValidationError::InvalidUrl("INVENTORY__ACTIVITIES_BASE_URL"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 5 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            flights_base_url: default_flights_url(),
            flights_api_key: None,
            hotels_base_url: default_hotels_url(),
            hotels_api_key: None,
            activities_base_url: None,
            activities_api_key: None,
            timeout_secs: default_timeout(),
            max_retries: default_retries(),
            retry_backoff_ms: default_backoff(),
        }
    }
}

pub(super) fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_flights_url() -> String {
    "https://api.amadeus.com".to_string()
}

fn default_hotels_url() -> String {
    "https://api.booking.com".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_retries() -> u32 {
    2
}

fn default_backoff() -> u64 {
    250
}
