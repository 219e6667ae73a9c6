//! File-based customer memory.
//!
//! Stores one YAML file per customer. File names are the hex SHA-256 of the
//! customer id, so arbitrary ids map to safe paths.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::CustomerId;
use crate::domain::travel::{CustomerProfile, ProfileUpdate};
use crate::ports::{CustomerMemory, MemoryError};

/// File-based storage for customer profiles
#[derive(Debug)]
pub struct FileCustomerMemory {
    base_path: PathBuf,
    /// Serializes read-modify-write cycles so concurrent sessions of the
    /// same customer cannot lose updates.
    write_lock: Mutex<()>,
}

impl FileCustomerMemory {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let memory = FileCustomerMemory::new("./data/customers");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn profile_path(&self, customer_id: &CustomerId) -> PathBuf {
        let digest = Sha256::digest(customer_id.as_str().as_bytes());
        self.base_path.join(format!("{:x}.yaml", digest))
    }

    async fn load(&self, customer_id: &CustomerId) -> Result<CustomerProfile, MemoryError> {
        let path = self.profile_path(customer_id);

        let yaml = match fs::read_to_string(&path).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(CustomerProfile::empty(customer_id.clone()))
            }
            Err(e) => return Err(MemoryError::IoError(e.to_string())),
        };

        serde_yaml::from_str(&yaml).map_err(|e| MemoryError::DeserializationFailed(e.to_string()))
    }
}

#[async_trait]
impl CustomerMemory for FileCustomerMemory {
    async fn recall(&self, customer_id: &CustomerId) -> Result<CustomerProfile, MemoryError> {
        self.load(customer_id).await
    }

    async fn remember(
        &self,
        customer_id: &CustomerId,
        update: ProfileUpdate,
    ) -> Result<CustomerProfile, MemoryError> {
        let _guard = self.write_lock.lock().await;

        let mut profile = self.load(customer_id).await?;
        profile.apply(update);

        let yaml = serde_yaml::to_string(&profile)
            .map_err(|e| MemoryError::SerializationFailed(e.to_string()))?;

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| MemoryError::IoError(e.to_string()))?;

        // Write then rename so a crash never leaves a truncated profile
        let path = self.profile_path(customer_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml)
            .await
            .map_err(|e| MemoryError::IoError(e.to_string()))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| MemoryError::IoError(e.to_string()))?;

        tracing::debug!(customer_id = %customer_id, path = %path.display(), "Profile written");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;
    use crate::domain::travel::{BookingRecord, Money};
    use serde_json::json;
    use tempfile::TempDir;

    fn customer() -> CustomerId {
        CustomerId::new("cust/../1").unwrap()
    }

    fn record(number: &str) -> BookingRecord {
        BookingRecord {
            confirmation_number: number.to_string(),
            offers: Vec::new(),
            total: Money::new(10_000, "USD").unwrap(),
            booked_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn missing_file_yields_empty_profile() {
        let dir = TempDir::new().unwrap();
        let memory = FileCustomerMemory::new(dir.path());

        let profile = memory.recall(&customer()).await.unwrap();
        assert!(profile.is_empty());
    }

    #[tokio::test]
    async fn remembered_profile_survives_new_instance() {
        let dir = TempDir::new().unwrap();
        FileCustomerMemory::new(dir.path())
            .remember(&customer(), ProfileUpdate::latest_booking(record("TRV-1")))
            .await
            .unwrap();

        let profile = FileCustomerMemory::new(dir.path())
            .recall(&customer())
            .await
            .unwrap();
        assert_eq!(
            profile.latest_booking.map(|b| b.confirmation_number),
            Some("TRV-1".to_string())
        );
    }

    #[tokio::test]
    async fn later_booking_overwrites_earlier() {
        let dir = TempDir::new().unwrap();
        let memory = FileCustomerMemory::new(dir.path());
        let seeded = ProfileUpdate {
            preferences: Some(json!({"budget": "mid"})),
            latest_booking: Some(record("TRV-1")),
        };

        memory.remember(&customer(), seeded).await.unwrap();
        memory
            .remember(&customer(), ProfileUpdate::latest_booking(record("TRV-2")))
            .await
            .unwrap();

        let profile = memory.recall(&customer()).await.unwrap();
        assert_eq!(profile.latest_booking.unwrap().confirmation_number, "TRV-2");
        assert_eq!(profile.preferences["budget"], "mid");
    }

    #[tokio::test]
    async fn customer_ids_never_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let memory = FileCustomerMemory::new(dir.path());

        let path = memory.profile_path(&customer());
        assert_eq!(path.parent(), Some(dir.path()));
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let dir = TempDir::new().unwrap();
        let memory = FileCustomerMemory::new(dir.path());
        std::fs::write(memory.profile_path(&customer()), "customer_id: [unclosed").unwrap();

        let err = memory.recall(&customer()).await.unwrap_err();
        assert!(matches!(err, MemoryError::DeserializationFailed(_)));
    }
}
