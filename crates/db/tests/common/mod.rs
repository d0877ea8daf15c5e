//! Fixture helpers shared by the repository integration tests.

#![allow(dead_code)]

use marketplace_db::models::submission::{CreateSubmission, Submission};
use marketplace_db::models::user::{CreateUser, User};
use marketplace_db::models::work_item::{CreateWorkItem, WorkItem};
use marketplace_db::repositories::{SubmissionRepo, UserRepo, WorkItemRepo};
use sqlx::PgPool;

pub struct Fixture {
    pub admin: User,
    pub creator: User,
    pub work_item: WorkItem,
    pub submission: Submission,
}

pub async fn seed(pool: &PgPool, reward: i64) -> Fixture {
    let admin = UserRepo::create(
        pool,
        &CreateUser {
            username: "admin".to_string(),
            role: "admin".to_string(),
        },
    )
    .await
    .unwrap();
    let creator = UserRepo::create(
        pool,
        &CreateUser {
            username: "creator".to_string(),
            role: "creator".to_string(),
        },
    )
    .await
    .unwrap();
    let work_item = WorkItemRepo::create(
        pool,
        &CreateWorkItem {
            owner_id: creator.id,
            title: "Poster generator".to_string(),
            reward_amount: reward,
        },
    )
    .await
    .unwrap();
    let submission = SubmissionRepo::create(
        pool,
        &CreateSubmission {
            user_id: creator.id,
            work_item_id: work_item.id,
            title: "Poster generator v1".to_string(),
            description: None,
            api_code: r#"{"workflow_id": "7391"}"#.to_string(),
            reward_amount: reward,
        },
    )
    .await
    .unwrap();

    Fixture {
        admin,
        creator,
        work_item,
        submission,
    }
}
