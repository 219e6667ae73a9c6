//! Inventory Provider Port - Interface for flight, hotel and activity search.
//!
//! Implementations issue one request per call to one external provider and
//! normalize the response into [`Offer`] records. Retries, timeouts and
//! concurrency across categories are the caller's concern.

use async_trait::async_trait;

use crate::domain::travel::{
    ActivityQuery, FlightQuery, HotelQuery, Offer, OfferCategory, TravelError,
};

/// Errors that can occur during an inventory search
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InventoryError {
    #[error("{category} search is not configured")]
    NotConfigured { category: OfferCategory },

    #[error("{provider} request failed: {message}")]
    Remote { provider: String, message: String },

    #[error("{provider} rejected the credentials")]
    Unauthorized { provider: String },

    #[error("{provider} rate limit exceeded")]
    RateLimited { provider: String },

    #[error("{provider} returned a malformed response: {message}")]
    Malformed { provider: String, message: String },
}

impl InventoryError {
    pub fn remote(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn malformed(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<InventoryError> for TravelError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Malformed { provider, message } => {
                TravelError::malformed(provider, message)
            }
            InventoryError::NotConfigured { category } => {
                TravelError::remote(format!("{}_search", category), "provider not configured")
            }
            InventoryError::Remote { ref provider, .. }
            | InventoryError::Unauthorized { ref provider }
            | InventoryError::RateLimited { ref provider } => {
                TravelError::remote(provider.clone(), err.to_string())
            }
        }
    }
}

/// Port for travel inventory searches
#[async_trait]
pub trait InventoryProvider: Send + Sync {
    /// Search flight offers.
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<Offer>, InventoryError>;

    /// Search hotel offers.
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<Offer>, InventoryError>;

    /// Search activity offers.
    async fn search_activities(&self, query: &ActivityQuery)
        -> Result<Vec<Offer>, InventoryError>;
}
