//! Persisted review session rows and the review action request bodies.

use marketplace_core::error::CoreError;
use marketplace_core::review::{ReviewLease, ReviewOutcome, ReviewSession, ReviewStep};
use marketplace_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `review_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReviewSessionRow {
    pub submission_id: DbId,
    pub steps: Json<Vec<ReviewStep>>,
    pub current_step_index: i32,
    pub outcome: String,
    pub version: i32,
    pub lease_holder: Option<DbId>,
    pub lease_expires_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ReviewSessionRow {
    /// Rebuild the in-memory state machine from this row.
    pub fn to_session(&self) -> Result<ReviewSession, CoreError> {
        let outcome = ReviewOutcome::parse(&self.outcome).ok_or_else(|| {
            CoreError::Internal(format!(
                "Unknown review outcome '{}' for submission {}",
                self.outcome, self.submission_id
            ))
        })?;
        let index = usize::try_from(self.current_step_index).map_err(|_| {
            CoreError::Internal(format!(
                "Negative review step index for submission {}",
                self.submission_id
            ))
        })?;
        ReviewSession::from_parts(self.steps.0.clone(), index, outcome)
    }

    pub fn lease(&self) -> Option<ReviewLease> {
        ReviewLease::from_columns(self.lease_holder, self.lease_expires_at)
    }
}

/// Request body for `POST …/review/approve`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApproveStepRequest {
    pub expected_version: i32,
    pub comment: Option<String>,
}

/// Request body for `POST …/review/reject`.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectStepRequest {
    pub expected_version: i32,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub comment: Option<String>,
}

/// Request body for `POST …/review/previous`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviousStepRequest {
    pub expected_version: i32,
}
