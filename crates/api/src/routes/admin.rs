//! Route definitions for the admin review queue and review sessions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{external_test, review, submission};
use crate::state::AppState;

/// Routes mounted at `/admin/submissions`.
///
/// All routes require the `admin` role (enforced by handler extractors).
///
/// ```text
/// GET    /                              -> list_submissions
/// GET    /{id}                          -> get_submission
/// GET    /{id}/review                   -> get_review_session
/// POST   /{id}/review/claim             -> claim_review
/// DELETE /{id}/review/claim             -> release_review
/// POST   /{id}/review/approve           -> approve_step
/// POST   /{id}/review/reject            -> reject_step
/// POST   /{id}/review/previous          -> previous_step
/// POST   /{id}/review/external-test     -> run_external_test
/// GET    /{id}/generation-tasks         -> list_generation_tasks
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(submission::list_submissions))
        .route("/{id}", get(submission::get_submission))
        .route("/{id}/review", get(review::get_review_session))
        .route(
            "/{id}/review/claim",
            post(review::claim_review).delete(review::release_review),
        )
        .route("/{id}/review/approve", post(review::approve_step))
        .route("/{id}/review/reject", post(review::reject_step))
        .route("/{id}/review/previous", post(review::previous_step))
        .route(
            "/{id}/review/external-test",
            post(external_test::run_external_test),
        )
        .route(
            "/{id}/generation-tasks",
            get(external_test::list_generation_tasks),
        )
}
