//! Read-only views of the active review policy.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/review-policy
pub async fn get_review_policy(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.policy.as_ref().clone(),
    }))
}

/// GET /api/v1/admin/review-policy/steps/{step_id}/rejection-options
///
/// Unknown step ids get the generic fallback reason rather than a 404.
pub async fn list_rejection_options(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(step_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: state.policy.rejection_options(&step_id),
    }))
}
