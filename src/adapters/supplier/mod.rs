//! Supplier confirmation adapters.

mod http_supplier_gateway;
mod local_supplier_gateway;

pub use http_supplier_gateway::{HttpSupplierConfig, HttpSupplierGateway};
pub use local_supplier_gateway::LocalSupplierGateway;
