//! Read access to the `balance_transactions` ledger and the reward pool.

use marketplace_core::types::{Credits, DbId};
use sqlx::PgPool;

use crate::models::balance_transaction::BalanceTransaction;

/// Column list for balance_transactions queries.
const COLUMNS: &str =
    "id, user_id, submission_id, kind, amount, balance_after, comment, created_at";

/// Provides read operations for the balance ledger.
pub struct BalanceTransactionRepo;

impl BalanceTransactionRepo {
    /// List ledger rows referencing a submission, oldest first.
    pub async fn list_for_submission(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<BalanceTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM balance_transactions
             WHERE submission_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, BalanceTransaction>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }

    /// Current balance of the platform reward pool.
    pub async fn reward_pool_balance(pool: &PgPool) -> Result<Credits, sqlx::Error> {
        let row: (Credits,) = sqlx::query_as("SELECT balance FROM reward_pool WHERE id = 1")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Add credits to the platform reward pool, returning the new balance.
    pub async fn fund_reward_pool(pool: &PgPool, amount: Credits) -> Result<Credits, sqlx::Error> {
        let row: (Credits,) = sqlx::query_as(
            "UPDATE reward_pool SET balance = balance + $1 WHERE id = 1 RETURNING balance",
        )
        .bind(amount)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
