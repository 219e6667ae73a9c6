//! Application layer - orchestration of the booking conversation.
//!
//! The three client wrappers put timeouts, retries and idempotency around
//! the ports. The workflow controller sequences them per session.

pub mod booking_client;
pub mod conversation_engine;
pub mod inventory_search;
pub mod session_registry;
pub mod workflow;

pub use booking_client::{render_confirmation_email, BookingClient, BookingSettings};
pub use conversation_engine::{ConversationEngine, EngineSettings, ModelReply};
pub use inventory_search::{InventorySearchClient, SearchOutcome, SearchPolicy};
pub use session_registry::{SessionHandle, SessionRegistry};
pub use workflow::{
    RunOutcome, WorkflowController, WorkflowDependencies, WorkflowError, WorkflowSettings,
};
