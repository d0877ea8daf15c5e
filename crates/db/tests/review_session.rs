//! Integration tests for review session persistence.

mod common;

use chrono::Utc;
use marketplace_core::review::{ReviewLease, ReviewOutcome, ReviewPolicy, StepStatus};
use marketplace_db::models::submission::SubmissionRejection;
use marketplace_db::models::status::SubmissionStatus;
use marketplace_db::repositories::{ReviewSessionRepo, SubmissionRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_if_absent_inserts_once(pool: PgPool) {
    let fx = common::seed(&pool, 10).await;
    let steps = ReviewPolicy::default().default_steps();

    let mut conn = pool.acquire().await.unwrap();
    assert!(ReviewSessionRepo::create_if_absent(&mut *conn, fx.submission.id, &steps)
        .await
        .unwrap());
    assert!(!ReviewSessionRepo::create_if_absent(&mut *conn, fx.submission.id, &steps)
        .await
        .unwrap());

    let row = ReviewSessionRepo::find(&pool, fx.submission.id).await.unwrap().unwrap();
    assert_eq!(row.version, 1);
    assert_eq!(row.current_step_index, 0);
    let session = row.to_session().unwrap();
    assert_eq!(session.steps().len(), 4);
    assert_eq!(session.outcome(), ReviewOutcome::InProgress);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn save_state_checks_version(pool: PgPool) {
    let fx = common::seed(&pool, 10).await;
    let steps = ReviewPolicy::default().default_steps();
    let mut conn = pool.acquire().await.unwrap();
    ReviewSessionRepo::create_if_absent(&mut *conn, fx.submission.id, &steps)
        .await
        .unwrap();

    let row = ReviewSessionRepo::find(&pool, fx.submission.id).await.unwrap().unwrap();
    let mut session = row.to_session().unwrap();
    session.reject_current(&["描述信息不完整".to_string()]).unwrap();

    let stale = ReviewSessionRepo::save_state(&mut *conn, fx.submission.id, 7, &session)
        .await
        .unwrap();
    assert!(stale.is_none());

    let saved = ReviewSessionRepo::save_state(&mut *conn, fx.submission.id, 1, &session)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.version, 2);
    assert_eq!(saved.outcome, "rejected");
    assert_eq!(saved.steps.0[0].status, StepStatus::Rejected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn terminal_save_releases_lease(pool: PgPool) {
    let fx = common::seed(&pool, 10).await;
    let steps = ReviewPolicy::default().default_steps();
    let mut conn = pool.acquire().await.unwrap();
    ReviewSessionRepo::create_if_absent(&mut *conn, fx.submission.id, &steps)
        .await
        .unwrap();
    let lease = ReviewLease::grant(fx.admin.id, Utc::now(), 600);
    let leased = ReviewSessionRepo::set_lease(&mut *conn, fx.submission.id, Some(&lease))
        .await
        .unwrap();
    assert_eq!(leased.lease_holder, Some(fx.admin.id));
    assert_eq!(leased.version, 1);

    let mut session = leased.to_session().unwrap();
    session.reject_current(&["分类选择错误".to_string()]).unwrap();
    let saved = ReviewSessionRepo::save_state(&mut *conn, fx.submission.id, 1, &session)
        .await
        .unwrap()
        .unwrap();

    assert!(saved.lease().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_rejected_only_touches_pending_submissions(pool: PgPool) {
    let fx = common::seed(&pool, 10).await;
    let rejection = SubmissionRejection {
        step_id: "workflow_file_check",
        reason: "测试参数不完整",
        comment: Some("请补充参数说明"),
        reviewed_by: fx.admin.id,
    };

    let mut conn = pool.acquire().await.unwrap();
    let rejected = SubmissionRepo::mark_rejected(&mut *conn, fx.submission.id, &rejection)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rejected.status_id, SubmissionStatus::Rejected.id());
    assert_eq!(rejected.rejected_step_id.as_deref(), Some("workflow_file_check"));
    assert_eq!(
        rejected.review_comment.as_deref(),
        Some("测试参数不完整\n请补充参数说明")
    );

    let again = SubmissionRepo::mark_rejected(&mut *conn, fx.submission.id, &rejection)
        .await
        .unwrap();
    assert!(again.is_none());
}
