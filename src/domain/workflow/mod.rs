//! Workflow module - the booking conversation as a state machine.
//!
//! Steps and their transitions, the intent classification that drives the
//! one conditional branch, selection of offers from a booking reply, and the
//! per-run session state.

mod intent;
mod selection;
mod session;
mod step;

pub use intent::{Intent, IntentClassifier, KeywordIntentClassifier};
pub use selection::SelectionResolver;
pub use session::SessionState;
pub use step::WorkflowStep;
