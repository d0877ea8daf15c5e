//! Follow-up executions registered by the external API test step.

use marketplace_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Status of a freshly registered generation task.
pub const GENERATION_STATUS_RUNNING: &str = "running";

/// A row from the `generation_tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GenerationTask {
    pub id: DbId,
    pub submission_id: DbId,
    pub execute_id: String,
    pub debug_url: Option<String>,
    pub status: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a generation task.
#[derive(Debug, Clone)]
pub struct CreateGenerationTask {
    pub submission_id: DbId,
    pub execute_id: String,
    pub debug_url: Option<String>,
    pub created_by: DbId,
}
