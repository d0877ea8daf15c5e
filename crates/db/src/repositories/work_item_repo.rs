//! Repository for the `work_items` table.

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::work_item::{CreateWorkItem, WorkItem};

/// Column list for work_items queries.
const COLUMNS: &str = "id, owner_id, title, status_id, reward_amount, created_at, updated_at";

/// Provides CRUD operations for work items.
pub struct WorkItemRepo;

impl WorkItemRepo {
    /// Insert a new draft work item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateWorkItem) -> Result<WorkItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO work_items (owner_id, title, reward_amount)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(input.owner_id)
            .bind(&input.title)
            .bind(input.reward_amount)
            .fetch_one(pool)
            .await
    }

    /// Find a work item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<WorkItem>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM work_items WHERE id = $1");
        sqlx::query_as::<_, WorkItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
