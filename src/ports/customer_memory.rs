//! Customer Memory Port - preferences and history across conversations.

use async_trait::async_trait;

use crate::domain::foundation::CustomerId;
use crate::domain::travel::{CustomerProfile, ProfileUpdate, TravelError};

/// Errors that can occur during memory store operations
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("Failed to serialize profile: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize profile: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<MemoryError> for TravelError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::DeserializationFailed(message) => {
                TravelError::malformed("customer_memory", message)
            }
            other => TravelError::remote("customer_memory", other.to_string()),
        }
    }
}

/// Port for the customer memory store
#[async_trait]
pub trait CustomerMemory: Send + Sync {
    /// Loads a customer's profile.
    ///
    /// Unknown customers get [`CustomerProfile::empty`]; a missing record
    /// is never an error.
    async fn recall(&self, customer_id: &CustomerId) -> Result<CustomerProfile, MemoryError>;

    /// Writes `update` over the stored profile (last write wins).
    async fn remember(
        &self,
        customer_id: &CustomerId,
        update: ProfileUpdate,
    ) -> Result<CustomerProfile, MemoryError>;
}
