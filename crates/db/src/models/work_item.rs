//! Work item (published workflow / AI app) model.

use marketplace_core::types::{Credits, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `work_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkItem {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub status_id: StatusId,
    /// Reward advertised for an accepted submission.
    pub reward_amount: Credits,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a work item. New items start as drafts.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkItem {
    pub owner_id: DbId,
    pub title: String,
    pub reward_amount: Credits,
}
