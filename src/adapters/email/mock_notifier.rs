//! Mock notifier for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{DeliveryStatus, EmailMessage, NotificationError, NotificationProvider};

/// Records sent messages and answers with a configurable status.
#[derive(Clone)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
    status_code: u16,
    error: Option<NotificationError>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotifier {
    /// A notifier that accepts every message with status 202.
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            status_code: 202,
            error: None,
        }
    }

    /// Answer with the given HTTP status instead of 202.
    pub fn with_status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    /// Fail every send with the given error.
    pub fn failing(error: NotificationError) -> Self {
        Self {
            error: Some(error),
            ..Self::new()
        }
    }

    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationProvider for MockNotifier {
    async fn send(&self, message: EmailMessage) -> Result<DeliveryStatus, NotificationError> {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }
        self.sent.lock().unwrap().push(message);
        Ok(DeliveryStatus::from_status(self.status_code))
    }
}
