//! Repository for the `submissions` table.

use marketplace_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use marketplace_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::status::SubmissionStatus;
use crate::models::submission::{CreateSubmission, Submission, SubmissionRejection};

/// Column list for submissions queries.
const COLUMNS: &str = "id, user_id, work_item_id, title, description, api_code, status_id, \
    reward_amount, review_comment, rejected_step_id, reviewed_by, reviewed_at, \
    created_at, updated_at";

/// Provides CRUD operations for submissions.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Insert a new pending submission, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSubmission,
    ) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "INSERT INTO submissions
                (user_id, work_item_id, title, description, api_code, status_id, reward_amount)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.user_id)
            .bind(input.work_item_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.api_code)
            .bind(SubmissionStatus::Pending.id())
            .bind(input.reward_amount)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM submissions WHERE id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List submissions for the admin review queue, oldest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<SubmissionStatus>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let limit = clamp_limit(limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
        let offset = clamp_offset(offset);
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE ($1::SMALLINT IS NULL OR status_id = $1)
             ORDER BY created_at ASC, id ASC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(status.map(SubmissionStatus::id))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// List a creator's own submissions, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM submissions
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a pending submission rejected inside the caller's transaction.
    ///
    /// Returns `None` if the submission is missing or no longer pending.
    pub async fn mark_rejected(
        conn: &mut PgConnection,
        id: DbId,
        rejection: &SubmissionRejection<'_>,
    ) -> Result<Option<Submission>, sqlx::Error> {
        let review_comment = match rejection.comment.map(str::trim) {
            Some(c) if !c.is_empty() => format!("{}\n{c}", rejection.reason),
            _ => rejection.reason.to_string(),
        };
        let query = format!(
            "UPDATE submissions
             SET status_id = $2,
                 rejected_step_id = $3,
                 review_comment = $4,
                 reviewed_by = $5,
                 reviewed_at = NOW()
             WHERE id = $1 AND status_id = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .bind(SubmissionStatus::Rejected.id())
            .bind(rejection.step_id)
            .bind(&review_comment)
            .bind(rejection.reviewed_by)
            .bind(SubmissionStatus::Pending.id())
            .fetch_optional(conn)
            .await
    }
}
