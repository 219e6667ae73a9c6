//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the application and the outside world. Adapters implement these ports.
//!
//! ## Remote Service Ports
//!
//! - `AIProvider` - Language model completions with tool calling
//! - `InventoryProvider` - Flight, hotel and activity search
//! - `PaymentProvider` - Idempotent charges
//! - `SupplierGateway` - Supplier confirmation after payment
//! - `NotificationProvider` - Confirmation emails
//!
//! ## Storage Ports
//!
//! - `CustomerMemory` - Customer profiles across conversations
//! - `BookingLedger` - Idempotency records for completed bookings

mod ai_provider;
mod booking_ledger;
mod customer_memory;
mod inventory_provider;
mod notification_provider;
mod payment_provider;
mod supplier_gateway;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    RequestMetadata, TokenUsage,
};
pub use booking_ledger::{BookingLedger, LedgerError};
pub use customer_memory::{CustomerMemory, MemoryError};
pub use inventory_provider::{InventoryError, InventoryProvider};
pub use notification_provider::{DeliveryStatus, EmailMessage, NotificationError, NotificationProvider};
pub use payment_provider::{
    Charge, ChargeRequest, ChargeStatus, PaymentError, PaymentErrorCode, PaymentProvider,
};
pub use supplier_gateway::{SupplierError, SupplierGateway};
