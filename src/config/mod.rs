//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `TRAVEL_AGENT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use travel_agent::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod ai;
mod email;
mod error;
mod inventory;
mod memory;
mod payment;
mod server;
mod supplier;
mod workflow;

pub use ai::AiConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use inventory::InventoryConfig;
pub use memory::{MemoryBackend, MemoryConfig};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use supplier::SupplierConfig;
pub use workflow::WorkflowConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables,
/// then call [`AppConfig::validate()`] before building adapters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Language model configuration (Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    /// Flight, hotel and activity search providers
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Payment configuration (Stripe)
    #[serde(default)]
    pub payment: PaymentConfig,

    /// Supplier confirmation endpoint
    #[serde(default)]
    pub supplier: SupplierConfig,

    /// Email configuration (SendGrid)
    #[serde(default)]
    pub email: EmailConfig,

    /// Turn cap, step deadline and history bound
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Customer memory store backend
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TRAVEL_AGENT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TRAVEL_AGENT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `TRAVEL_AGENT__WORKFLOW__MAX_TURNS=5` -> `workflow.max_turns = 5`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TRAVEL_AGENT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.inventory.validate()?;
        self.payment.validate()?;
        self.supplier.validate()?;
        self.email.validate()?;
        self.workflow.validate()?;
        self.memory.validate()?;

        // A reply must finish inside the HTTP request timeout, or the run is
        // dropped mid-step without being aborted.
        let request = self.server.request_timeout();
        let run = self.workflow.run_deadline();
        if request < run {
            return Err(ValidationError::RequestTimeoutBelowRunDeadline {
                request_secs: request.as_secs(),
                run_secs: run.as_secs(),
            });
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
