//! Handlers for creator submissions and the admin review queue.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use marketplace_core::error::CoreError;
use marketplace_core::submission::validate_new_submission;
use marketplace_core::types::DbId;
use marketplace_db::models::status::SubmissionStatus;
use marketplace_db::models::submission::{
    CreateSubmission, Submission, SubmissionListQuery, SubmitWorkRequest,
};
use marketplace_db::repositories::{SubmissionRepo, WorkItemRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{RequireAdmin, RequireCreator};
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a submission or fail with 404.
pub async fn ensure_submission_exists(pool: &PgPool, id: DbId) -> AppResult<Submission> {
    SubmissionRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id,
        })
    })
}

/// POST /api/v1/submissions
///
/// Submit work for a work item the caller owns. The reward is fixed from
/// the work item's advertised amount at this point.
pub async fn submit_work(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
    Json(input): Json<SubmitWorkRequest>,
) -> AppResult<impl IntoResponse> {
    validate_new_submission(&input.title, input.description.as_deref(), &input.api_code)?;

    let work_item = WorkItemRepo::find_by_id(&state.pool, input.work_item_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "WorkItem",
                id: input.work_item_id,
            })
        })?;
    if work_item.owner_id != user.user_id && !user.is_admin() {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only submit work for your own work items".into(),
        )));
    }

    let create = CreateSubmission {
        user_id: user.user_id,
        work_item_id: work_item.id,
        title: input.title.trim().to_string(),
        description: input.description,
        api_code: input.api_code,
        reward_amount: work_item.reward_amount,
    };
    let submission = SubmissionRepo::create(&state.pool, &create).await?;

    tracing::info!(
        user_id = user.user_id,
        submission_id = submission.id,
        work_item_id = work_item.id,
        reward_amount = submission.reward_amount,
        "Submission created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: submission })))
}

/// GET /api/v1/submissions/mine
pub async fn list_my_submissions(
    RequireCreator(user): RequireCreator,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let submissions = SubmissionRepo::list_for_user(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// GET /api/v1/admin/submissions?status=&limit=&offset=
///
/// The review queue, oldest first. `status` filters by name.
pub async fn list_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubmissionListQuery>,
) -> AppResult<impl IntoResponse> {
    let status = params
        .status
        .as_deref()
        .map(|name| {
            SubmissionStatus::from_name(name)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown submission status '{name}'")))
        })
        .transpose()?;

    let submissions =
        SubmissionRepo::list(&state.pool, status, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: submissions }))
}

/// GET /api/v1/admin/submissions/{id}
pub async fn get_submission(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let submission = ensure_submission_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: submission }))
}
