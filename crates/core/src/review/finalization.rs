//! Contract between the review state machine and the finalization backend.
//!
//! Finalization publishes the work item, credits the submitter, and records
//! the payout. Implementations must perform all three atomically: the state
//! machine treats [`Finalizer::finalize`] as a single call and never attempts
//! a partial rollback itself.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Credits, DbId};

/// Input for a finalization call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationRequest {
    pub submission_id: DbId,
    pub work_item_id: DbId,
    pub user_id: DbId,
    pub reward_amount: Credits,
    pub comment: Option<String>,
}

/// Answer of a finalization call.
///
/// `success: false` is a business refusal (for example an exhausted reward
/// pool); transport or database failures are reported as `Err` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_balance: Option<Credits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FinalizationResult {
    pub fn succeeded(new_balance: Credits) -> Self {
        Self {
            success: true,
            new_balance: Some(new_balance),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            new_balance: None,
            message: Some(message.into()),
        }
    }
}

/// Backend that publishes a submission and pays its reward.
#[async_trait]
pub trait Finalizer: Send {
    async fn finalize(
        &mut self,
        request: &FinalizationRequest,
    ) -> Result<FinalizationResult, CoreError>;
}
