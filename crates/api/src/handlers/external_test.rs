//! Handler for the external API test of a submission's workflow.
//!
//! The reviewer runs the submitted workflow with test parameters and reads
//! the provider's raw answer before deciding the step. Nothing here changes
//! the review session.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use marketplace_core::error::CoreError;
use marketplace_core::review::lease::ensure_holder;
use marketplace_core::review::ReviewError;
use marketplace_core::types::DbId;
use marketplace_db::models::generation_task::{CreateGenerationTask, GenerationTask};
use marketplace_db::repositories::{GenerationTaskRepo, ReviewSessionRepo};
use marketplace_harness::{extract_workflow_id, ExternalTestRequest, ExternalTestResponse};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::submission::ensure_submission_exists;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST …/review/external-test`.
#[derive(Debug, Deserialize)]
pub struct RunExternalTestRequest {
    /// Test parameter values, forwarded unchanged.
    #[serde(default)]
    pub parameters: serde_json::Value,
    /// Overrides the id found in the submission's API code.
    pub workflow_id: Option<String>,
    /// Overrides the configured provider token for this run.
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExternalTestOutcome {
    pub workflow_id: String,
    pub response: ExternalTestResponse,
    /// Follow-up task registered when the provider queued an async job.
    pub generation_task: Option<GenerationTask>,
}

/// POST /api/v1/admin/submissions/{id}/review/external-test
///
/// Only allowed while the current step is the policy's external test step
/// and the caller holds the review lease.
pub async fn run_external_test(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<RunExternalTestRequest>,
) -> AppResult<impl IntoResponse> {
    let submission = ensure_submission_exists(&state.pool, submission_id).await?;
    let row = ReviewSessionRepo::find(&state.pool, submission_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Claim the submission before reviewing it".into(),
            ))
        })?;
    let session = row.to_session()?;
    if session.outcome().is_terminal() {
        return Err(ReviewError::Terminal(session.outcome()).into());
    }
    ensure_holder(row.lease().as_ref(), admin.user_id, Utc::now())?;

    let current = session.current_step();
    if !current.runs_external_test {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "External test is not available during review step '{}'",
            current.id
        ))));
    }

    let workflow_id = input
        .workflow_id
        .filter(|id| !id.trim().is_empty())
        .or_else(|| extract_workflow_id(&submission.api_code))
        .ok_or_else(|| {
            AppError::BadRequest("No workflow id found in the submission's API code".into())
        })?;

    let request = ExternalTestRequest {
        workflow_id: workflow_id.clone(),
        parameters: match input.parameters {
            serde_json::Value::Null => serde_json::json!({}),
            other => other,
        },
        auth_token: input.auth_token,
    };
    let response = state.harness.run_workflow(&request).await?;

    let generation_task = match &response.execute_id {
        Some(execute_id) => {
            let task = GenerationTaskRepo::create(
                &state.pool,
                &CreateGenerationTask {
                    submission_id,
                    execute_id: execute_id.clone(),
                    debug_url: response.debug_url.clone(),
                    created_by: admin.user_id,
                },
            )
            .await?;
            Some(task)
        }
        None => None,
    };

    tracing::info!(
        user_id = admin.user_id,
        submission_id,
        workflow_id = %workflow_id,
        execute_id = ?response.execute_id,
        "External API test executed"
    );

    Ok(Json(DataResponse {
        data: ExternalTestOutcome {
            workflow_id,
            response,
            generation_task,
        },
    }))
}

/// GET /api/v1/admin/submissions/{id}/generation-tasks
pub async fn list_generation_tasks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_submission_exists(&state.pool, submission_id).await?;
    let tasks = GenerationTaskRepo::list_for_submission(&state.pool, submission_id).await?;
    Ok(Json(DataResponse { data: tasks }))
}
