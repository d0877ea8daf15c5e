//! Submission models and DTOs.

use marketplace_core::types::{Credits, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub user_id: DbId,
    pub work_item_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub api_code: String,
    pub status_id: StatusId,
    /// Fixed when the submission is created; paid only on full approval.
    pub reward_amount: Credits,
    pub review_comment: Option<String>,
    pub rejected_step_id: Option<String>,
    pub reviewed_by: Option<DbId>,
    pub reviewed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a submission.
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub user_id: DbId,
    pub work_item_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub api_code: String,
    pub reward_amount: Credits,
}

/// Request body for `POST /api/v1/submissions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitWorkRequest {
    pub work_item_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub api_code: String,
}

/// Query parameters for `GET /api/v1/admin/submissions`.
#[derive(Debug, Deserialize)]
pub struct SubmissionListQuery {
    /// Filter by status name (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
    /// Maximum number of results. Defaults to 20, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Rejection details written to a submission when a review step fails.
#[derive(Debug, Clone)]
pub struct SubmissionRejection<'a> {
    pub step_id: &'a str,
    pub reason: &'a str,
    pub comment: Option<&'a str>,
    pub reviewed_by: DbId,
}
