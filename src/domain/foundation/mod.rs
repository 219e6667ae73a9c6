//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, validation errors and the state machine trait
//! used by the travel and workflow modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{CustomerId, SessionId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
