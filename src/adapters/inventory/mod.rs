//! Inventory search adapters.

mod http_inventory_provider;
mod mock_inventory_provider;

pub use http_inventory_provider::{Endpoint, HttpInventoryConfig, HttpInventoryProvider};
pub use mock_inventory_provider::{sample_offers, MockInventoryProvider};
