//! Route definitions for creator submissions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submission;
use crate::state::AppState;

/// Routes mounted at `/submissions`.
///
/// ```text
/// POST   /          -> submit_work
/// GET    /mine      -> list_my_submissions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submission::submit_work))
        .route("/mine", get(submission::list_my_submissions))
}
