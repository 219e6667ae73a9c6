//! In-memory customer memory for development and tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::CustomerId;
use crate::domain::travel::{CustomerProfile, ProfileUpdate};
use crate::ports::{CustomerMemory, MemoryError};

/// Customer profiles held in a process-local map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCustomerMemory {
    profiles: Arc<RwLock<HashMap<CustomerId, CustomerProfile>>>,
}

impl InMemoryCustomerMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a profile, replacing any stored one.
    pub async fn insert(&self, profile: CustomerProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.customer_id.clone(), profile);
    }

    /// Number of customers with a stored profile.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl CustomerMemory for InMemoryCustomerMemory {
    async fn recall(&self, customer_id: &CustomerId) -> Result<CustomerProfile, MemoryError> {
        Ok(self
            .profiles
            .read()
            .await
            .get(customer_id)
            .cloned()
            .unwrap_or_else(|| CustomerProfile::empty(customer_id.clone())))
    }

    async fn remember(
        &self,
        customer_id: &CustomerId,
        update: ProfileUpdate,
    ) -> Result<CustomerProfile, MemoryError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .entry(customer_id.clone())
            .or_insert_with(|| CustomerProfile::empty(customer_id.clone()));
        profile.apply(update);
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer() -> CustomerId {
        CustomerId::new("cust-1").unwrap()
    }

    #[tokio::test]
    async fn unknown_customer_gets_empty_profile() {
        let memory = InMemoryCustomerMemory::new();
        let profile = memory.recall(&customer()).await.unwrap();

        assert!(profile.is_empty());
        assert!(memory.is_empty().await);
    }

    #[tokio::test]
    async fn remember_then_recall() {
        let memory = InMemoryCustomerMemory::new();
        let update = ProfileUpdate {
            preferences: Some(json!({"seat": "aisle"})),
            latest_booking: None,
        };

        memory.remember(&customer(), update).await.unwrap();
        let profile = memory.recall(&customer()).await.unwrap();

        assert_eq!(profile.preferences["seat"], "aisle");
        assert!(profile.updated_at.is_some());
        assert_eq!(memory.len().await, 1);
    }
}
