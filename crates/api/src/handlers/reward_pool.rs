//! Admin access to the platform reward pool that pays approved submissions.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use marketplace_core::submission::validate_pool_funding;
use marketplace_db::models::balance_transaction::{FundRewardPoolRequest, RewardPool};
use marketplace_db::repositories::BalanceTransactionRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/reward-pool
pub async fn get_reward_pool(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let balance = BalanceTransactionRepo::reward_pool_balance(&state.pool).await?;
    Ok(Json(DataResponse {
        data: RewardPool { balance },
    }))
}

/// POST /api/v1/admin/reward-pool/fund
///
/// Final approvals are refused while the pool cannot cover the reward, so
/// the pool has to be topped up before any submission can be paid.
pub async fn fund_reward_pool(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<FundRewardPoolRequest>,
) -> AppResult<impl IntoResponse> {
    validate_pool_funding(input.amount)?;

    let balance = BalanceTransactionRepo::fund_reward_pool(&state.pool, input.amount).await?;

    tracing::info!(
        user_id = admin.user_id,
        amount = input.amount,
        balance,
        "Reward pool funded"
    );

    Ok(Json(DataResponse {
        data: RewardPool { balance },
    }))
}
