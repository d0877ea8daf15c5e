//! Route definitions for the review policy.

use axum::routing::get;
use axum::Router;

use crate::handlers::review_policy;
use crate::state::AppState;

/// Routes mounted at `/admin/review-policy`.
///
/// ```text
/// GET    /                                    -> get_review_policy
/// GET    /steps/{step_id}/rejection-options   -> list_rejection_options
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(review_policy::get_review_policy))
        .route(
            "/steps/{step_id}/rejection-options",
            get(review_policy::list_rejection_options),
        )
}
