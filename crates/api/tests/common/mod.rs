#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use marketplace_api::auth::jwt::{generate_access_token, JwtConfig};
use marketplace_api::config::{HarnessConfig, ServerConfig};
use marketplace_api::router::build_app_router;
use marketplace_api::state::AppState;
use marketplace_core::review::ReviewPolicy;
use marketplace_db::models::submission::{CreateSubmission, Submission};
use marketplace_db::models::user::{CreateUser, User};
use marketplace_db::models::work_item::{CreateWorkItem, WorkItem};
use marketplace_db::repositories::{SubmissionRepo, UserRepo, WorkItemRepo};

/// Nothing listens on the discard port, so harness calls fail fast unless a
/// test points the client at its own stub provider.
pub const UNREACHABLE_HARNESS_URL: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(harness_base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        review_lease_secs: 600,
        review_policy_path: None,
        harness: HarnessConfig {
            base_url: harness_base_url.to_string(),
            api_token: Some("test-provider-token".to_string()),
            timeout_secs: 5,
        },
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_harness(pool, UNREACHABLE_HARNESS_URL)
}

pub fn build_test_app_with_harness(pool: PgPool, harness_base_url: &str) -> Router {
    let config = test_config(harness_base_url);
    let harness = config
        .harness
        .build_client()
        .expect("harness client should build");
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        policy: Arc::new(ReviewPolicy::default()),
        harness: Arc::new(harness),
    };
    build_app_router(state, &config)
}

/// Access token for `user` signed with the test secret.
pub fn token_for(user: &User) -> String {
    let config = test_config(UNREACHABLE_HARNESS_URL);
    generate_access_token(user.id, &user.role, &config.jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

pub async fn create_work_item(pool: &PgPool, owner: &User, reward: i64) -> WorkItem {
    WorkItemRepo::create(
        pool,
        &CreateWorkItem {
            owner_id: owner.id,
            title: "Portrait relighting".to_string(),
            reward_amount: reward,
        },
    )
    .await
    .expect("work item creation should succeed")
}

pub async fn create_submission(pool: &PgPool, creator: &User, item: &WorkItem) -> Submission {
    SubmissionRepo::create(
        pool,
        &CreateSubmission {
            user_id: creator.id,
            work_item_id: item.id,
            title: "Portrait relighting v2".to_string(),
            description: Some("Relights a portrait from a text prompt".to_string()),
            api_code: r#"{"workflow_id": "1850000000000000001", "nodeInfoList": []}"#
                .to_string(),
            reward_amount: item.reward_amount,
        },
    )
    .await
    .expect("submission creation should succeed")
}

/// An admin, a creator, and one pending submission worth `reward` credits.
pub struct ReviewFixture {
    pub admin: User,
    pub creator: User,
    pub work_item: WorkItem,
    pub submission: Submission,
}

impl ReviewFixture {
    pub async fn new(pool: &PgPool, reward: i64) -> Self {
        let admin = create_user(pool, "reviewer", "admin").await;
        let creator = create_user(pool, "maker", "creator").await;
        let work_item = create_work_item(pool, &creator, reward).await;
        let submission = create_submission(pool, &creator, &work_item).await;
        Self {
            admin,
            creator,
            work_item,
            submission,
        }
    }

    pub fn review_uri(&self, action: &str) -> String {
        format!("/api/v1/admin/submissions/{}/review{action}", self.submission.id)
    }
}
