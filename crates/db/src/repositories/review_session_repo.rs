//! Repository for the `review_sessions` table.
//!
//! Mutating methods run on a caller-owned connection so the session update
//! commits together with the submission and ledger writes of the same
//! decision.

use marketplace_core::review::{ReviewLease, ReviewOutcome, ReviewSession, ReviewStep};
use marketplace_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::models::review_session::ReviewSessionRow;

/// Column list for review_sessions queries.
const COLUMNS: &str = "submission_id, steps, current_step_index, outcome, version, \
    lease_holder, lease_expires_at, created_at, updated_at";

/// Provides persistence for review sessions.
pub struct ReviewSessionRepo;

impl ReviewSessionRepo {
    /// Find the session for a submission without locking.
    pub async fn find(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Option<ReviewSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM review_sessions WHERE submission_id = $1");
        sqlx::query_as::<_, ReviewSessionRow>(&query)
            .bind(submission_id)
            .fetch_optional(pool)
            .await
    }

    /// Find and row-lock the session for the rest of the transaction.
    pub async fn find_for_update(
        conn: &mut PgConnection,
        submission_id: DbId,
    ) -> Result<Option<ReviewSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM review_sessions WHERE submission_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, ReviewSessionRow>(&query)
            .bind(submission_id)
            .fetch_optional(conn)
            .await
    }

    /// Create a fresh session with the given steps unless one already exists.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn create_if_absent(
        conn: &mut PgConnection,
        submission_id: DbId,
        steps: &[ReviewStep],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO review_sessions (submission_id, steps, current_step_index, outcome)
             VALUES ($1, $2, 0, $3)
             ON CONFLICT (submission_id) DO NOTHING",
        )
        .bind(submission_id)
        .bind(Json(steps))
        .bind(ReviewOutcome::InProgress.as_str())
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Set or clear the review lease. Does not change the session version.
    pub async fn set_lease(
        conn: &mut PgConnection,
        submission_id: DbId,
        lease: Option<&ReviewLease>,
    ) -> Result<ReviewSessionRow, sqlx::Error> {
        let query = format!(
            "UPDATE review_sessions
             SET lease_holder = $2, lease_expires_at = $3
             WHERE submission_id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSessionRow>(&query)
            .bind(submission_id)
            .bind(lease.map(|l| l.holder))
            .bind(lease.map(|l| l.expires_at))
            .fetch_one(conn)
            .await
    }

    /// Persist the state machine if the stored version still equals
    /// `expected_version`, bumping the version.
    ///
    /// A session that reaches a terminal outcome also drops its lease.
    /// Returns `None` on a version mismatch.
    pub async fn save_state(
        conn: &mut PgConnection,
        submission_id: DbId,
        expected_version: i32,
        session: &ReviewSession,
    ) -> Result<Option<ReviewSessionRow>, sqlx::Error> {
        let index = i32::try_from(session.current_step_index())
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;
        let query = format!(
            "UPDATE review_sessions
             SET steps = $3,
                 current_step_index = $4,
                 outcome = $5,
                 version = version + 1,
                 lease_holder = CASE WHEN $6 THEN NULL ELSE lease_holder END,
                 lease_expires_at = CASE WHEN $6 THEN NULL ELSE lease_expires_at END
             WHERE submission_id = $1 AND version = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ReviewSessionRow>(&query)
            .bind(submission_id)
            .bind(expected_version)
            .bind(Json(session.steps()))
            .bind(index)
            .bind(session.outcome().as_str())
            .bind(session.outcome().is_terminal())
            .fetch_optional(conn)
            .await
    }
}
