//! Errors raised by review session transitions.

use super::step::{ReviewOutcome, StepStatus};
use crate::error::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// The session already reached `approved` or `rejected`.
    #[error("Review is already {0}; no further decisions are accepted")]
    Terminal(ReviewOutcome),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Already at the first review step")]
    NoPreviousStep,

    #[error("Review step '{step_id}' is {status} and cannot be decided")]
    StepNotActionable { step_id: String, status: StepStatus },

    /// The finalizer answered `success: false`. The last step stays pending.
    #[error("Finalization failed: {0}")]
    FinalizationRejected(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<ReviewError> for CoreError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Validation(msg) => CoreError::Validation(msg),
            ReviewError::Core(core) => core,
            other @ (ReviewError::Terminal(_)
            | ReviewError::NoPreviousStep
            | ReviewError::StepNotActionable { .. }
            | ReviewError::FinalizationRejected(_)) => CoreError::Conflict(other.to_string()),
        }
    }
}
