//! Review step records and status values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Step id of the basic information check.
pub const STEP_BASIC_INFO_CHECK: &str = "basic_info_check";

/// Step id of the workflow file / invocation code check.
pub const STEP_WORKFLOW_FILE_CHECK: &str = "workflow_file_check";

/// Step id of the external API test.
pub const STEP_EXTERNAL_API_TEST: &str = "external_api_test";

/// Step id of the final approval.
pub const STEP_FINAL_APPROVAL: &str = "final_approval";

/// Decision state of a single review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Approved,
    Rejected,
    Skipped,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Approved => "approved",
            StepStatus::Rejected => "rejected",
            StepStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stage of the review checklist as it stands in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewStep {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: StepStatus,
    /// Joined rejection reasons, set only when `status` is `rejected`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Whether the external test harness may be run while this step is current.
    #[serde(default)]
    pub runs_external_test: bool,
}

/// Aggregate outcome of a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    InProgress,
    Approved,
    Rejected,
}

impl ReviewOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ReviewOutcome::InProgress => "in_progress",
            ReviewOutcome::Approved => "approved",
            ReviewOutcome::Rejected => "rejected",
        }
    }

    /// Parse the value stored in `review_sessions.outcome`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(ReviewOutcome::InProgress),
            "approved" => Some(ReviewOutcome::Approved),
            "rejected" => Some(ReviewOutcome::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, ReviewOutcome::InProgress)
    }
}

impl fmt::Display for ReviewOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
