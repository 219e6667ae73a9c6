//! Customer profiles persisted across conversations.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CustomerId, Timestamp};

use super::BookingRecord;

/// Preferences and booking history for one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub customer_id: CustomerId,
    /// Opaque preference blob (seat class, budget, dietary needs...).
    #[serde(default)]
    pub preferences: serde_json::Value,
    #[serde(default)]
    pub latest_booking: Option<BookingRecord>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
}

impl CustomerProfile {
    /// Profile for a customer with no stored data.
    pub fn empty(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            preferences: serde_json::Value::Null,
            latest_booking: None,
            updated_at: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.preferences.is_null() && self.latest_booking.is_none()
    }

    /// Replaces the stored data with `update`.
    ///
    /// Preferences are only replaced when the update carries them.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(preferences) = update.preferences {
            self.preferences = preferences;
        }
        self.latest_booking = update.latest_booking;
        self.updated_at = Some(Timestamp::now());
    }
}

/// Data written to a profile after a completed booking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
    #[serde(default)]
    pub latest_booking: Option<BookingRecord>,
}

impl ProfileUpdate {
    pub fn latest_booking(record: BookingRecord) -> Self {
        Self {
            preferences: None,
            latest_booking: Some(record),
        }
    }
}
