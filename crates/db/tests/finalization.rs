//! Integration tests for the Postgres finalizer.

mod common;

use assert_matches::assert_matches;
use marketplace_core::error::CoreError;
use marketplace_core::review::{FinalizationRequest, Finalizer};
use marketplace_db::models::status::{SubmissionStatus, WorkItemStatus};
use marketplace_db::repositories::finalization_repo::INSUFFICIENT_POOL_MESSAGE;
use marketplace_db::repositories::{
    BalanceTransactionRepo, PgFinalizer, SubmissionRepo, UserRepo, WorkItemRepo,
};
use sqlx::PgPool;

fn request(fx: &common::Fixture) -> FinalizationRequest {
    FinalizationRequest {
        submission_id: fx.submission.id,
        work_item_id: fx.work_item.id,
        user_id: fx.creator.id,
        reward_amount: fx.submission.reward_amount,
        comment: Some("通过".to_string()),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_publishes_pays_and_records(pool: PgPool) {
    let fx = common::seed(&pool, 300).await;
    BalanceTransactionRepo::fund_reward_pool(&pool, 1_000).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let result = PgFinalizer::new(&mut *tx, fx.admin.id)
        .finalize(&request(&fx))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(result.success);
    assert_eq!(result.new_balance, Some(300));

    let creator = UserRepo::find_by_id(&pool, fx.creator.id).await.unwrap().unwrap();
    assert_eq!(creator.balance, 300);

    let item = WorkItemRepo::find_by_id(&pool, fx.work_item.id).await.unwrap().unwrap();
    assert_eq!(item.status_id, WorkItemStatus::Online.id());

    let submission = SubmissionRepo::find_by_id(&pool, fx.submission.id).await.unwrap().unwrap();
    assert_eq!(submission.status_id, SubmissionStatus::Approved.id());
    assert_eq!(submission.reviewed_by, Some(fx.admin.id));

    let ledger = BalanceTransactionRepo::list_for_submission(&pool, fx.submission.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger[0].amount, 300);
    assert_eq!(ledger[0].balance_after, 300);

    assert_eq!(BalanceTransactionRepo::reward_pool_balance(&pool).await.unwrap(), 700);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finalize_refuses_when_pool_is_short(pool: PgPool) {
    let fx = common::seed(&pool, 300).await;
    BalanceTransactionRepo::fund_reward_pool(&pool, 100).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let result = PgFinalizer::new(&mut *tx, fx.admin.id)
        .finalize(&request(&fx))
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(!result.success);
    assert_eq!(result.message.as_deref(), Some(INSUFFICIENT_POOL_MESSAGE));

    let submission = SubmissionRepo::find_by_id(&pool, fx.submission.id).await.unwrap().unwrap();
    assert_eq!(submission.status_id, SubmissionStatus::Pending.id());
    let item = WorkItemRepo::find_by_id(&pool, fx.work_item.id).await.unwrap().unwrap();
    assert_eq!(item.status_id, WorkItemStatus::Draft.id());
    assert_eq!(BalanceTransactionRepo::reward_pool_balance(&pool).await.unwrap(), 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_payout_for_same_submission_conflicts(pool: PgPool) {
    let fx = common::seed(&pool, 50).await;
    BalanceTransactionRepo::fund_reward_pool(&pool, 1_000).await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    PgFinalizer::new(&mut *tx, fx.admin.id)
        .finalize(&request(&fx))
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let again = PgFinalizer::new(&mut *tx, fx.admin.id)
        .finalize(&request(&fx))
        .await;
    tx.rollback().await.unwrap();

    assert_matches!(again, Err(CoreError::Conflict(msg)) if msg.contains("already paid"));
    let creator = UserRepo::find_by_id(&pool, fx.creator.id).await.unwrap().unwrap();
    assert_eq!(creator.balance, 50);
}
