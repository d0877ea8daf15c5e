//! Balance ledger rows.

use marketplace_core::types::{Credits, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Ledger kind for a reward paid out on submission approval.
pub const KIND_SUBMISSION_REWARD: &str = "submission_reward";

/// A row from the `balance_transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BalanceTransaction {
    pub id: DbId,
    pub user_id: DbId,
    pub submission_id: Option<DbId>,
    pub kind: String,
    pub amount: Credits,
    pub balance_after: Credits,
    pub comment: Option<String>,
    pub created_at: Timestamp,
}

/// Balance of the platform reward pool.
#[derive(Debug, Clone, Serialize)]
pub struct RewardPool {
    pub balance: Credits,
}

/// DTO for topping up the reward pool.
#[derive(Debug, Clone, Deserialize)]
pub struct FundRewardPoolRequest {
    pub amount: Credits,
}
