pub mod admin;
pub mod health;
pub mod review_policy;
pub mod reward_pool;
pub mod submissions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /submissions                                      submit work (creator)
/// /submissions/mine                                 caller's submissions
///
/// /admin/submissions                                review queue (admin only)
/// /admin/submissions/{id}                           submission detail
/// /admin/submissions/{id}/review                    current review session
/// /admin/submissions/{id}/review/claim              claim (POST), release (DELETE)
/// /admin/submissions/{id}/review/approve            approve current step
/// /admin/submissions/{id}/review/reject             reject current step
/// /admin/submissions/{id}/review/previous           back one step
/// /admin/submissions/{id}/review/external-test      run the workflow test
/// /admin/submissions/{id}/generation-tasks          registered follow-up tasks
///
/// /admin/review-policy                              active policy
/// /admin/review-policy/steps/{step_id}/rejection-options
///
/// /admin/reward-pool                                pool balance
/// /admin/reward-pool/fund                           top up the pool
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Creator submissions.
        .nest("/submissions", submissions::router())
        // Admin review queue and review sessions.
        .nest("/admin/submissions", admin::router())
        // Review policy (step registry + rejection catalog).
        .nest("/admin/review-policy", review_policy::router())
        // Reward pool that pays approved submissions.
        .nest("/admin/reward-pool", reward_pool::router())
}
