//! Workflow orchestration.

mod controller;
mod errors;

pub use controller::{
    RunOutcome, WorkflowController, WorkflowDependencies, WorkflowSettings,
};
pub use errors::WorkflowError;
