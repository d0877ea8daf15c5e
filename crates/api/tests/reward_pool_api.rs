//! HTTP-level integration tests for the reward pool endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_auth, post_json_auth, ReviewFixture};
use marketplace_db::repositories::UserRepo;
use serde_json::json;
use sqlx::PgPool;

async fn fund(pool: &PgPool, token: &str, amount: i64) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/reward-pool/fund",
        json!({ "amount": amount }),
        token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn approve(
    pool: &PgPool,
    fx: &ReviewFixture,
    token: &str,
    version: i64,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &fx.review_uri("/approve"),
        json!({ "expected_version": version }),
        token,
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Balance and funding
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn fresh_pool_is_empty_and_can_be_funded(pool: PgPool) {
    let admin = common::create_user(&pool, "treasurer", "admin").await;
    let token = common::token_for(&admin);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/admin/reward-pool", &token).await).await;
    assert_eq!(json["data"]["balance"], 0);

    let (status, json) = fund(&pool, &token, 400).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["balance"], 400);

    let (_, json) = fund(&pool, &token, 100).await;
    assert_eq!(json["data"]["balance"], 500);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_funding_is_validation_error(pool: PgPool) {
    let admin = common::create_user(&pool, "treasurer", "admin").await;
    let token = common::token_for(&admin);

    for amount in [0, -50] {
        let (status, json) = fund(&pool, &token, amount).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/admin/reward-pool", &token).await).await;
    assert_eq!(json["data"]["balance"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn creators_cannot_fund_pool(pool: PgPool) {
    let creator = common::create_user(&pool, "maker", "creator").await;

    let (status, _) = fund(&pool, &common::token_for(&creator), 1_000).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Funding unblocks payouts
// ---------------------------------------------------------------------------

/// On a fresh deployment the final approval is refused until an admin
/// funds the pool through the API.
#[sqlx::test(migrations = "../../db/migrations")]
async fn funded_pool_pays_final_approval(pool: PgPool) {
    let fx = ReviewFixture::new(&pool, 300).await;
    let token = common::token_for(&fx.admin);

    let app = common::build_test_app(pool.clone());
    let claimed = body_json(post_auth(app, &fx.review_uri("/claim"), &token).await).await;
    let mut version = claimed["data"]["version"].as_i64().unwrap();

    for _ in 0..3 {
        let (status, json) = approve(&pool, &fx, &token, version).await;
        assert_eq!(status, StatusCode::OK);
        version = json["data"]["session"]["version"].as_i64().unwrap();
    }
    let (status, json) = approve(&pool, &fx, &token, version).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("insufficient reward pool balance"));

    let (status, _) = fund(&pool, &token, 300).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = approve(&pool, &fx, &token, version).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["session"]["outcome"], "approved");
    assert_eq!(json["data"]["finalization"]["new_balance"], 300);

    let creator = UserRepo::find_by_id(&pool, fx.creator.id).await.unwrap().unwrap();
    assert_eq!(creator.balance, 300);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/admin/reward-pool", &token).await).await;
    assert_eq!(json["data"]["balance"], 0);
}
