//! Handlers for the multi-step review session of a submission.
//!
//! Every decision runs in one transaction: the session row is locked with
//! `FOR UPDATE`, the caller's lease and `expected_version` are checked, the
//! state machine transition is applied, and the new state is saved with a
//! bumped version. Finalization writes share that transaction, so a refused
//! or failed payout leaves nothing behind.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use marketplace_core::error::CoreError;
use marketplace_core::review::lease::{check_claim, ensure_holder, ensure_version};
use marketplace_core::review::{
    ApproveOutcome, FinalizationRequest, FinalizationResult, ReviewError, ReviewLease,
    ReviewOutcome, ReviewSession, ReviewStep,
};
use marketplace_core::submission::validate_review_comment;
use marketplace_core::types::DbId;
use marketplace_db::models::review_session::{
    ApproveStepRequest, PreviousStepRequest, RejectStepRequest, ReviewSessionRow,
};
use marketplace_db::models::status::SubmissionStatus;
use marketplace_db::models::submission::SubmissionRejection;
use marketplace_db::repositories::{PgFinalizer, ReviewSessionRepo, SubmissionRepo};
use serde::Serialize;
use sqlx::PgConnection;

use crate::error::{AppError, AppResult};
use crate::handlers::submission::ensure_submission_exists;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Review session as shown to the reviewer.
#[derive(Debug, Serialize)]
pub struct ReviewSessionView {
    pub submission_id: DbId,
    pub steps: Vec<ReviewStep>,
    pub current_step_index: usize,
    pub outcome: ReviewOutcome,
    /// `0` until the session is first claimed and stored.
    pub version: i32,
    pub lease: Option<ReviewLease>,
}

impl ReviewSessionView {
    fn new(
        submission_id: DbId,
        session: &ReviewSession,
        version: i32,
        lease: Option<ReviewLease>,
    ) -> Self {
        Self {
            submission_id,
            steps: session.steps().to_vec(),
            current_step_index: session.current_step_index(),
            outcome: session.outcome(),
            version,
            lease,
        }
    }

    fn from_row(row: &ReviewSessionRow) -> AppResult<Self> {
        let session = row.to_session()?;
        Ok(Self::new(row.submission_id, &session, row.version, row.lease()))
    }
}

/// Response of an approve / reject / previous decision.
#[derive(Debug, Serialize)]
pub struct ReviewDecisionResponse {
    pub session: ReviewSessionView,
    /// Present when the decision finalized the submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalization: Option<FinalizationResult>,
}

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

async fn lock_session(conn: &mut PgConnection, submission_id: DbId) -> AppResult<ReviewSessionRow> {
    ReviewSessionRepo::find_for_update(conn, submission_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Claim the submission before reviewing it".into(),
            ))
        })
}

/// Lock the session and check that `user_id` may decide on it at
/// `expected_version`.
async fn lock_for_decision(
    conn: &mut PgConnection,
    submission_id: DbId,
    user_id: DbId,
    expected_version: i32,
) -> AppResult<ReviewSession> {
    let row = lock_session(conn, submission_id).await?;
    let session = row.to_session()?;
    if session.outcome().is_terminal() {
        return Err(ReviewError::Terminal(session.outcome()).into());
    }
    ensure_holder(row.lease().as_ref(), user_id, Utc::now())?;
    ensure_version(expected_version, row.version)?;
    Ok(session)
}

async fn save_session(
    conn: &mut PgConnection,
    submission_id: DbId,
    expected_version: i32,
    session: &ReviewSession,
) -> AppResult<ReviewSessionRow> {
    ReviewSessionRepo::save_state(conn, submission_id, expected_version, session)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Review session was modified concurrently".into(),
            ))
        })
}

/* --------------------------------------------------------------------------
Session lifecycle
-------------------------------------------------------------------------- */

/// GET /api/v1/admin/submissions/{id}/review
///
/// The stored session, or a fresh one from the active policy if the
/// submission has never been claimed.
pub async fn get_review_session(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_submission_exists(&state.pool, submission_id).await?;

    let view = match ReviewSessionRepo::find(&state.pool, submission_id).await? {
        Some(row) => ReviewSessionView::from_row(&row)?,
        None => ReviewSessionView::new(
            submission_id,
            &ReviewSession::start(&state.policy),
            0,
            None,
        ),
    };
    Ok(Json(DataResponse { data: view }))
}

/// POST /api/v1/admin/submissions/{id}/review/claim
///
/// Acquire or renew the review lease, creating the session on first claim.
pub async fn claim_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let submission = ensure_submission_exists(&state.pool, submission_id).await?;
    if submission.status_id != SubmissionStatus::Pending.id() {
        return Err(AppError::Core(CoreError::Conflict(
            "Submission has already been reviewed".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;
    let created =
        ReviewSessionRepo::create_if_absent(&mut *tx, submission_id, &state.policy.default_steps())
            .await?;
    let row = lock_session(&mut *tx, submission_id).await?;
    let session = row.to_session()?;
    if session.outcome().is_terminal() {
        return Err(ReviewError::Terminal(session.outcome()).into());
    }

    let now = Utc::now();
    check_claim(row.lease().as_ref(), admin.user_id, now)?;
    let lease = ReviewLease::grant(admin.user_id, now, state.config.review_lease_secs);
    let row = ReviewSessionRepo::set_lease(&mut *tx, submission_id, Some(&lease)).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = admin.user_id,
        submission_id,
        created,
        lease_expires_at = %lease.expires_at,
        "Review session claimed"
    );

    Ok(Json(DataResponse {
        data: ReviewSessionView::from_row(&row)?,
    }))
}

/// DELETE /api/v1/admin/submissions/{id}/review/claim
///
/// Release the caller's lease. Releasing an absent or expired lease is a
/// no-op; another reviewer's active lease is a conflict.
pub async fn release_review(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let row = ReviewSessionRepo::find_for_update(&mut *tx, submission_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "ReviewSession",
                id: submission_id,
            })
        })?;

    let row = match row.lease() {
        Some(lease) if lease.holder == admin.user_id => {
            ReviewSessionRepo::set_lease(&mut *tx, submission_id, None).await?
        }
        Some(lease) if lease.is_active(Utc::now()) => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Review lease is held by user {}",
                lease.holder
            ))));
        }
        _ => row,
    };
    tx.commit().await?;

    tracing::info!(user_id = admin.user_id, submission_id, "Review session released");

    Ok(Json(DataResponse {
        data: ReviewSessionView::from_row(&row)?,
    }))
}

/* --------------------------------------------------------------------------
Decisions
-------------------------------------------------------------------------- */

/// POST /api/v1/admin/submissions/{id}/review/approve
///
/// Approve the current step. On the last step the submission is published
/// and paid in the same transaction; a refused payout leaves the step
/// pending and is reported as 409.
pub async fn approve_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<ApproveStepRequest>,
) -> AppResult<impl IntoResponse> {
    validate_review_comment(input.comment.as_deref())?;
    let submission = ensure_submission_exists(&state.pool, submission_id).await?;

    let mut tx = state.pool.begin().await?;
    let mut session =
        lock_for_decision(&mut *tx, submission_id, admin.user_id, input.expected_version).await?;
    let step_id = session.current_step().id.clone();

    let request = FinalizationRequest {
        submission_id,
        work_item_id: submission.work_item_id,
        user_id: submission.user_id,
        reward_amount: submission.reward_amount,
        comment: input.comment.clone(),
    };
    let result = {
        let mut finalizer = PgFinalizer::new(&mut *tx, admin.user_id);
        session.approve_current(&mut finalizer, &request).await
    };
    let outcome = match result {
        Ok(outcome) => outcome,
        Err(err) => {
            tracing::warn!(
                user_id = admin.user_id,
                submission_id,
                step_id = %step_id,
                error = %err,
                "Review step approval refused"
            );
            return Err(err.into());
        }
    };

    let row = save_session(&mut *tx, submission_id, input.expected_version, &session).await?;
    tx.commit().await?;

    let finalization = match outcome {
        ApproveOutcome::Advanced { step_index } => {
            tracing::info!(
                user_id = admin.user_id,
                submission_id,
                step_id = %step_id,
                decision = "approved",
                next_step_index = step_index,
                "Review step approved"
            );
            None
        }
        ApproveOutcome::Finalized(result) => {
            tracing::info!(
                user_id = admin.user_id,
                submission_id,
                step_id = %step_id,
                decision = "approved",
                reward_amount = submission.reward_amount,
                "Submission approved and finalized"
            );
            Some(result)
        }
    };

    Ok(Json(DataResponse {
        data: ReviewDecisionResponse {
            session: ReviewSessionView::from_row(&row)?,
            finalization,
        },
    }))
}

/// POST /api/v1/admin/submissions/{id}/review/reject
///
/// Reject the current step with one or more reasons. Ends the review and
/// marks the submission rejected.
pub async fn reject_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<RejectStepRequest>,
) -> AppResult<impl IntoResponse> {
    validate_review_comment(input.comment.as_deref())?;
    ensure_submission_exists(&state.pool, submission_id).await?;

    let mut tx = state.pool.begin().await?;
    let mut session =
        lock_for_decision(&mut *tx, submission_id, admin.user_id, input.expected_version).await?;
    let step = session.reject_current(&input.reasons)?.clone();
    let reason = step.rejection_reason.as_deref().unwrap_or_default();

    let rejection = SubmissionRejection {
        step_id: &step.id,
        reason,
        comment: input.comment.as_deref(),
        reviewed_by: admin.user_id,
    };
    SubmissionRepo::mark_rejected(&mut *tx, submission_id, &rejection)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Submission is no longer pending".into(),
            ))
        })?;

    let row = save_session(&mut *tx, submission_id, input.expected_version, &session).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = admin.user_id,
        submission_id,
        step_id = %step.id,
        decision = "rejected",
        reason = %reason,
        "Review step rejected"
    );

    Ok(Json(DataResponse {
        data: ReviewDecisionResponse {
            session: ReviewSessionView::from_row(&row)?,
            finalization: None,
        },
    }))
}

/// POST /api/v1/admin/submissions/{id}/review/previous
///
/// Move back one step. Step statuses are left as they are.
pub async fn previous_step(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<PreviousStepRequest>,
) -> AppResult<impl IntoResponse> {
    let mut tx = state.pool.begin().await?;
    let mut session =
        lock_for_decision(&mut *tx, submission_id, admin.user_id, input.expected_version).await?;
    let step_index = session.go_to_previous()?;

    let row = save_session(&mut *tx, submission_id, input.expected_version, &session).await?;
    tx.commit().await?;

    tracing::info!(
        user_id = admin.user_id,
        submission_id,
        step_index,
        "Review moved to previous step"
    );

    Ok(Json(DataResponse {
        data: ReviewDecisionResponse {
            session: ReviewSessionView::from_row(&row)?,
            finalization: None,
        },
    }))
}
