//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Request bodies for the endpoints that act on the entity

pub mod balance_transaction;
pub mod generation_task;
pub mod review_session;
pub mod status;
pub mod submission;
pub mod user;
pub mod work_item;
