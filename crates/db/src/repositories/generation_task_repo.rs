//! Repository for the `generation_tasks` table.

use marketplace_core::types::DbId;
use sqlx::PgPool;

use crate::models::generation_task::{CreateGenerationTask, GenerationTask, GENERATION_STATUS_RUNNING};

/// Column list for generation_tasks queries.
const COLUMNS: &str =
    "id, submission_id, execute_id, debug_url, status, created_by, created_at, updated_at";

/// Provides CRUD operations for generation tasks.
pub struct GenerationTaskRepo;

impl GenerationTaskRepo {
    /// Register a running generation task, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateGenerationTask,
    ) -> Result<GenerationTask, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_tasks (submission_id, execute_id, debug_url, status, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationTask>(&query)
            .bind(input.submission_id)
            .bind(&input.execute_id)
            .bind(&input.debug_url)
            .bind(GENERATION_STATUS_RUNNING)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// List generation tasks for a submission, newest first.
    pub async fn list_for_submission(
        pool: &PgPool,
        submission_id: DbId,
    ) -> Result<Vec<GenerationTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generation_tasks
             WHERE submission_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, GenerationTask>(&query)
            .bind(submission_id)
            .fetch_all(pool)
            .await
    }
}
