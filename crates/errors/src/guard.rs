//! Guard error types for the verification dispatcher

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors emitted by the guard subsystem once a run has been dispatched.
///
/// Per-item verification failures are never errors; they are folded into
/// flagged outcomes. Only structural failures of the run itself land here.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum GuardError {
    /// Every outcome sender went away before the run was complete.
    #[error("verification run lost outcomes: expected {expected}, received {received}")]
    OutcomesLost { expected: usize, received: usize },

    /// A verification task did not finish cleanly.
    #[error("verification task failed: {message}")]
    TaskFailed { message: String },

    /// Invalid concurrency budget.
    #[error("concurrency budget must be at least 1, got {value}")]
    InvalidBudget { value: usize },
}

impl UserFacingError for GuardError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::OutcomesLost { .. } | Self::TaskFailed { .. } => {
                Some("A verification task panicked; rerun with --debug and report the log.")
            }
            Self::InvalidBudget { .. } => Some("Pass a positive value to --jobs."),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::OutcomesLost { .. } => "guard.outcomes_lost",
            Self::TaskFailed { .. } => "guard.task_failed",
            Self::InvalidBudget { .. } => "guard.invalid_budget",
        };
        Some(code)
    }
}
