//! Errors that end a workflow run.

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::domain::travel::TravelError;
use crate::domain::workflow::WorkflowStep;

/// Why a workflow run stopped without completing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorkflowError {
    /// A step's remote call or validation failed.
    #[error("{step} failed: {source}")]
    StepFailed {
        step: WorkflowStep,
        #[source]
        source: TravelError,
    },

    #[error("conversation exceeded {limit} turns without a booking")]
    TurnLimitExceeded { limit: u32 },

    #[error("run cancelled before {step}")]
    Cancelled { step: WorkflowStep },

    /// An earlier run of this session failed at `step`.
    #[error("session was aborted at {step}")]
    Aborted { step: WorkflowStep },

    #[error("session already completed")]
    AlreadyCompleted,

    #[error("invalid transition: {0}")]
    InvalidTransition(#[from] ValidationError),
}

impl WorkflowError {
    pub fn step_failed(step: WorkflowStep, source: impl Into<TravelError>) -> Self {
        Self::StepFailed {
            step,
            source: source.into(),
        }
    }

    /// Step the run stopped at, where one applies.
    pub fn step(&self) -> Option<WorkflowStep> {
        match self {
            WorkflowError::StepFailed { step, .. }
            | WorkflowError::Cancelled { step }
            | WorkflowError::Aborted { step } => Some(*step),
            _ => None,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            WorkflowError::StepFailed { source, .. } => source.code(),
            WorkflowError::TurnLimitExceeded { .. } => "TURN_LIMIT_EXCEEDED",
            WorkflowError::Cancelled { .. } => "CANCELLED",
            WorkflowError::Aborted { .. } => "SESSION_ABORTED",
            WorkflowError::AlreadyCompleted => "SESSION_COMPLETED",
            WorkflowError::InvalidTransition(_) => "INVALID_TRANSITION",
        }
    }

    /// Customer-facing explanation naming the step that failed.
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::StepFailed {
                source: TravelError::PaymentDeclined { reason, .. },
                ..
            } => format!(
                "Your payment was declined ({}). You have not been charged and nothing was booked.",
                reason
            ),
            WorkflowError::StepFailed {
                step,
                source: TravelError::Validation(error),
            } => format!(
                "I couldn't continue with {}: {}.",
                step.description(),
                error
            ),
            WorkflowError::StepFailed { step, .. } => format!(
                "Sorry, something went wrong while {}. Please try again in a moment.",
                step.description()
            ),
            WorkflowError::TurnLimitExceeded { limit } => format!(
                "We've gone back and forth {} times without settling on a booking. Please start a new conversation when you're ready.",
                limit
            ),
            WorkflowError::Cancelled { .. } => "This conversation was cancelled.".to_string(),
            WorkflowError::Aborted { step } => format!(
                "This conversation stopped while {}. Please start a new one.",
                step.description()
            ),
            WorkflowError::AlreadyCompleted => {
                "Your booking is already complete. Start a new conversation to plan another trip."
                    .to_string()
            }
            WorkflowError::InvalidTransition(_) => {
                "Sorry, something went wrong on our side. Please start a new conversation."
                    .to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_failed_step() {
        let err = WorkflowError::step_failed(
            WorkflowStep::SearchOptions,
            TravelError::remote("flights", "503"),
        );
        assert!(err.user_message().contains("searching for travel options"));
        assert_eq!(err.step(), Some(WorkflowStep::SearchOptions));
        assert_eq!(err.code(), "REMOTE_SERVICE_ERROR");
    }

    #[test]
    fn decline_message_reassures_customer() {
        let err = WorkflowError::step_failed(
            WorkflowStep::ProcessBooking,
            TravelError::declined("insufficient funds", None),
        );
        let message = err.user_message();
        assert!(message.contains("declined"));
        assert!(message.contains("not been charged"));
    }

    #[test]
    fn validation_message_includes_detail() {
        let err = WorkflowError::step_failed(
            WorkflowStep::ProcessBooking,
            ValidationError::missing_parameter("payment_token"),
        );
        assert!(err.user_message().contains("payment_token"));
        assert_eq!(err.code(), "VALIDATION_FAILED");
    }

    #[test]
    fn turn_limit_has_no_step() {
        let err = WorkflowError::TurnLimitExceeded { limit: 10 };
        assert_eq!(err.step(), None);
        assert!(err.to_string().contains("10 turns"));
    }
}
