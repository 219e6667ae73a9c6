//! Workflow limits

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Most steps a single start or reply can run: understand, retrieve,
/// search and present.
pub const MAX_STEPS_PER_RUN: u32 = 4;

/// Bounds applied to every conversation run
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Customer replies allowed after options are first presented
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Deadline for a whole step, across retries, in seconds
    #[serde(default = "default_step_timeout")]
    pub step_timeout_secs: u64,

    /// Messages kept in the model's conversation window
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Sessions untouched for this long are dropped, in seconds
    #[serde(default = "default_session_idle")]
    pub session_idle_secs: u64,
}

impl WorkflowConfig {
    pub fn step_timeout(&self) -> Duration {
        Duration::from_secs(self.step_timeout_secs)
    }

    /// Worst-case duration of one start or reply.
    pub fn run_deadline(&self) -> Duration {
        self.step_timeout() * MAX_STEPS_PER_RUN
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_turns == 0 || self.max_turns > 100 {
            return Err(ValidationError::InvalidTurnLimit);
        }
        if self.history_limit < 2 || self.history_limit > 500 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        if self.step_timeout_secs == 0 || self.step_timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.session_idle_secs == 0 {
            return Err(ValidationError::InvalidSessionIdle);
        }
        Ok(())
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            step_timeout_secs: default_step_timeout(),
            history_limit: default_history_limit(),
            session_idle_secs: default_session_idle(),
        }
    }
}

fn default_max_turns() -> u32 {
    10
}

fn default_step_timeout() -> u64 {
    45
}

fn default_history_limit() -> usize {
    40
}

fn default_session_idle() -> u64 {
    1800
}
