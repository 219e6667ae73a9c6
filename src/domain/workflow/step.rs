//! Workflow steps and their transition table.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// A named step of the booking workflow.
///
/// ```text
/// UnderstandRequest -> RetrieveMemory -> SearchOptions -> PresentOptions
/// PresentOptions -> ProcessBooking | SearchOptions | UnderstandRequest
/// ProcessBooking -> SendConfirmation -> Completed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    UnderstandRequest,
    RetrieveMemory,
    SearchOptions,
    PresentOptions,
    ProcessBooking,
    SendConfirmation,
    Completed,
}

impl WorkflowStep {
    /// Step every run starts in.
    pub const INITIAL: WorkflowStep = WorkflowStep::UnderstandRequest;

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::UnderstandRequest => "understand_request",
            WorkflowStep::RetrieveMemory => "retrieve_memory",
            WorkflowStep::SearchOptions => "search_options",
            WorkflowStep::PresentOptions => "present_options",
            WorkflowStep::ProcessBooking => "process_booking",
            WorkflowStep::SendConfirmation => "send_confirmation",
            WorkflowStep::Completed => "completed",
        }
    }

    /// Human-readable description used in customer-facing error messages.
    pub fn description(&self) -> &'static str {
        match self {
            WorkflowStep::UnderstandRequest => "understanding your request",
            WorkflowStep::RetrieveMemory => "loading your travel profile",
            WorkflowStep::SearchOptions => "searching for travel options",
            WorkflowStep::PresentOptions => "preparing your options",
            WorkflowStep::ProcessBooking => "processing your booking",
            WorkflowStep::SendConfirmation => "sending your confirmation",
            WorkflowStep::Completed => "finishing up",
        }
    }

    /// The unconditional successor, if this step has exactly one.
    pub fn next(&self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::UnderstandRequest => Some(WorkflowStep::RetrieveMemory),
            WorkflowStep::RetrieveMemory => Some(WorkflowStep::SearchOptions),
            WorkflowStep::SearchOptions => Some(WorkflowStep::PresentOptions),
            WorkflowStep::ProcessBooking => Some(WorkflowStep::SendConfirmation),
            WorkflowStep::SendConfirmation => Some(WorkflowStep::Completed),
            WorkflowStep::PresentOptions | WorkflowStep::Completed => None,
        }
    }
}

impl StateMachine for WorkflowStep {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WorkflowStep::*;
        match self {
            PresentOptions => vec![ProcessBooking, SearchOptions, UnderstandRequest],
            Completed => vec![],
            other => other.next().into_iter().collect(),
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
