//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Anthropic Messages API and a scripted mock
//! - `inventory` - Flight, hotel and activity search APIs
//! - `stripe` - Card charges
//! - `supplier` - Supplier confirmation
//! - `email` - SendGrid confirmation emails
//! - `memory` - Customer profile stores (in-memory, YAML files)
//! - `ledger` - Booking idempotency records
//! - `http` - The axum REST API

pub mod ai;
pub mod email;
pub mod http;
pub mod inventory;
pub mod ledger;
pub mod memory;
pub mod stripe;
pub mod supplier;
