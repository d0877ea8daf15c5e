//! Postgres implementation of the review finalization contract.
//!
//! [`PgFinalizer`] borrows the connection of an open transaction. All of its
//! writes (reward pool debit, work item publication, balance credit, ledger
//! row, submission approval) commit or roll back together with the review
//! session update that follows it.

use async_trait::async_trait;
use marketplace_core::error::CoreError;
use marketplace_core::review::{FinalizationRequest, FinalizationResult, Finalizer};
use marketplace_core::types::{Credits, DbId};
use sqlx::PgConnection;

use crate::models::balance_transaction::KIND_SUBMISSION_REWARD;
use crate::models::status::{SubmissionStatus, WorkItemStatus};

/// Message returned when the platform pool cannot cover a reward.
pub const INSUFFICIENT_POOL_MESSAGE: &str = "insufficient reward pool balance";

/// Finalizer writing through a borrowed transaction connection.
pub struct PgFinalizer<'c> {
    conn: &'c mut PgConnection,
    reviewer_id: DbId,
}

impl<'c> PgFinalizer<'c> {
    pub fn new(conn: &'c mut PgConnection, reviewer_id: DbId) -> Self {
        Self { conn, reviewer_id }
    }

    async fn run(
        &mut self,
        request: &FinalizationRequest,
    ) -> Result<FinalizationResult, sqlx::Error> {
        let debited: Option<(Credits,)> = sqlx::query_as(
            "UPDATE reward_pool SET balance = balance - $1
             WHERE id = 1 AND balance >= $1
             RETURNING balance",
        )
        .bind(request.reward_amount)
        .fetch_optional(&mut *self.conn)
        .await?;
        if debited.is_none() {
            return Ok(FinalizationResult::failed(INSUFFICIENT_POOL_MESSAGE));
        }

        let published: Option<(DbId,)> = sqlx::query_as(
            "UPDATE work_items SET status_id = $2 WHERE id = $1 RETURNING id",
        )
        .bind(request.work_item_id)
        .bind(WorkItemStatus::Online.id())
        .fetch_optional(&mut *self.conn)
        .await?;
        if published.is_none() {
            return Ok(FinalizationResult::failed(format!(
                "work item {} no longer exists",
                request.work_item_id
            )));
        }

        let credited: Option<(Credits,)> = sqlx::query_as(
            "UPDATE users SET balance = balance + $2 WHERE id = $1 RETURNING balance",
        )
        .bind(request.user_id)
        .bind(request.reward_amount)
        .fetch_optional(&mut *self.conn)
        .await?;
        let Some((new_balance,)) = credited else {
            return Ok(FinalizationResult::failed(format!(
                "submitter {} no longer exists",
                request.user_id
            )));
        };

        sqlx::query(
            "INSERT INTO balance_transactions
                (user_id, submission_id, kind, amount, balance_after, comment)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(request.user_id)
        .bind(request.submission_id)
        .bind(KIND_SUBMISSION_REWARD)
        .bind(request.reward_amount)
        .bind(new_balance)
        .bind(&request.comment)
        .execute(&mut *self.conn)
        .await?;

        let approved: Option<(DbId,)> = sqlx::query_as(
            "UPDATE submissions
             SET status_id = $2, review_comment = $3, reviewed_by = $4, reviewed_at = NOW()
             WHERE id = $1 AND status_id = $5
             RETURNING id",
        )
        .bind(request.submission_id)
        .bind(SubmissionStatus::Approved.id())
        .bind(&request.comment)
        .bind(self.reviewer_id)
        .bind(SubmissionStatus::Pending.id())
        .fetch_optional(&mut *self.conn)
        .await?;
        if approved.is_none() {
            return Ok(FinalizationResult::failed(format!(
                "submission {} is no longer pending",
                request.submission_id
            )));
        }

        Ok(FinalizationResult::succeeded(new_balance))
    }
}

#[async_trait]
impl Finalizer for PgFinalizer<'_> {
    async fn finalize(
        &mut self,
        request: &FinalizationRequest,
    ) -> Result<FinalizationResult, CoreError> {
        let result = self.run(request).await.map_err(into_core_error)?;
        if result.success {
            tracing::info!(
                submission_id = request.submission_id,
                user_id = request.user_id,
                reward_amount = request.reward_amount,
                new_balance = ?result.new_balance,
                "Submission finalized"
            );
        } else {
            tracing::warn!(
                submission_id = request.submission_id,
                message = ?result.message,
                "Submission finalization refused"
            );
        }
        Ok(result)
    }
}

/// Map a database failure during finalization into a domain error.
///
/// A duplicate payout row means the reward was already paid.
fn into_core_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            return CoreError::Conflict(format!(
                "Reward already paid ({})",
                db_err.constraint().unwrap_or("unique violation")
            ));
        }
    }
    CoreError::Internal(format!("Finalization failed: {err}"))
}
