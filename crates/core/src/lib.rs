//! Domain layer for the workflow marketplace review service.
//!
//! Has no internal crate dependencies so the database, harness, and API
//! crates can all share the review state machine and its error types.

pub mod error;
pub mod pagination;
pub mod review;
pub mod roles;
pub mod submission;
pub mod types;
