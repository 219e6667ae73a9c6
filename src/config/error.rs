//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid Anthropic API key format")]
    InvalidAnthropicKey,

    #[error("Invalid Stripe API key format")]
    InvalidStripeKey,

    #[error("Invalid SendGrid API key format")]
    InvalidSendGridKey,

    #[error("Invalid from email address")]
    InvalidFromEmail,

    #[error("Invalid currency code")]
    InvalidCurrency,

    #[error("Conversation turn limit must be between 1 and 100")]
    InvalidTurnLimit,

    #[error("History limit must be between 2 and 500 messages")]
    InvalidHistoryLimit,

    #[error("Retry count must not exceed 5")]
    TooManyRetries,

    #[error("Session idle timeout must be positive")]
    InvalidSessionIdle,

    #[error("Request timeout of {request_secs}s is shorter than the {run_secs}s a reply may take")]
    RequestTimeoutBelowRunDeadline { request_secs: u64, run_secs: u64 },

    #[error("File memory backend requires a directory")]
    MissingMemoryDirectory,
}
