//! Domain layer containing the travel vocabulary and booking workflow rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, validation, state machines)
//! - `travel` - Offers, search parameters, bookings and customer profiles
//! - `conversation` - Messages, bounded history, prompts and tool schema
//! - `workflow` - Workflow steps, intent classification and session state

pub mod conversation;
pub mod foundation;
pub mod travel;
pub mod workflow;
