//! Client for the third-party workflow-execution API used by the external
//! API test review step.
//!
//! The harness only runs the submitted workflow and hands the raw response
//! back to the reviewer; it never decides the step on its own.

pub mod client;
pub mod workflow_id;

pub use client::{ExternalTestRequest, ExternalTestResponse, HarnessClient, HarnessError};
pub use workflow_id::extract_workflow_id;
