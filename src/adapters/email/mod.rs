//! Email notification adapters.

mod mock_notifier;
mod sendgrid_notifier;

pub use mock_notifier::MockNotifier;
pub use sendgrid_notifier::{SendGridConfig, SendGridNotifier};
