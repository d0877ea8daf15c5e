//! Route definitions for the reward pool.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::reward_pool;
use crate::state::AppState;

/// Routes mounted at `/admin/reward-pool`.
///
/// ```text
/// GET    /        -> get_reward_pool
/// POST   /fund    -> fund_reward_pool
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reward_pool::get_reward_pool))
        .route("/fund", post(reward_pool::fund_reward_pool))
}
