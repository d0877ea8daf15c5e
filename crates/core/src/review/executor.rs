//! The review session state machine.
//!
//! States are `(step i, pending)` for each step plus the two terminal
//! outcomes `approved` and `rejected`. Exactly one step is current while the
//! session is in progress. A rejection stops the session on the spot; the
//! last approval becomes effective only once the [`Finalizer`] reports
//! success, so a failed payout leaves the session retryable.

use serde::Serialize;

use super::error::ReviewError;
use super::finalization::{FinalizationRequest, FinalizationResult, Finalizer};
use super::policy::{ReviewPolicy, REASON_SEPARATOR};
use super::step::{ReviewOutcome, ReviewStep, StepStatus};
use crate::error::CoreError;

/// Result of a successful [`ReviewSession::approve_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApproveOutcome {
    /// A non-final step was approved; the pointer moved to `step_index`.
    Advanced { step_index: usize },
    /// The last step was approved and finalization succeeded.
    Finalized(FinalizationResult),
}

/// Step list, current pointer, and outcome of one submission's review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSession {
    steps: Vec<ReviewStep>,
    current_step_index: usize,
    outcome: ReviewOutcome,
}

impl ReviewSession {
    /// A fresh session over every step of `policy`, pointer at the first step.
    pub fn start(policy: &ReviewPolicy) -> Self {
        Self {
            steps: policy.default_steps(),
            current_step_index: 0,
            outcome: ReviewOutcome::InProgress,
        }
    }

    /// Rebuild a session from persisted state, checking it is coherent.
    pub fn from_parts(
        steps: Vec<ReviewStep>,
        current_step_index: usize,
        outcome: ReviewOutcome,
    ) -> Result<Self, CoreError> {
        if steps.is_empty() {
            return Err(CoreError::Internal(
                "Stored review session has no steps".to_string(),
            ));
        }
        if current_step_index >= steps.len() {
            return Err(CoreError::Internal(format!(
                "Stored review step index {current_step_index} is out of range for {} steps",
                steps.len()
            )));
        }
        Ok(Self {
            steps,
            current_step_index,
            outcome,
        })
    }

    pub fn steps(&self) -> &[ReviewStep] {
        &self.steps
    }

    pub fn current_step_index(&self) -> usize {
        self.current_step_index
    }

    pub fn current_step(&self) -> &ReviewStep {
        &self.steps[self.current_step_index]
    }

    pub fn outcome(&self) -> ReviewOutcome {
        self.outcome
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step_index + 1 == self.steps.len()
    }

    /// Approve the current step.
    ///
    /// On the last step this calls `finalizer` exactly once with `request`;
    /// the step is marked approved only if finalization succeeds.
    pub async fn approve_current<F>(
        &mut self,
        finalizer: &mut F,
        request: &FinalizationRequest,
    ) -> Result<ApproveOutcome, ReviewError>
    where
        F: Finalizer + ?Sized,
    {
        self.ensure_decidable()?;

        if !self.is_last_step() {
            self.steps[self.current_step_index].status = StepStatus::Approved;
            self.current_step_index += 1;
            return Ok(ApproveOutcome::Advanced {
                step_index: self.current_step_index,
            });
        }

        let result = finalizer.finalize(request).await?;
        if !result.success {
            let message = result
                .message
                .clone()
                .unwrap_or_else(|| "Finalization was not accepted".to_string());
            return Err(ReviewError::FinalizationRejected(message));
        }

        self.steps[self.current_step_index].status = StepStatus::Approved;
        self.outcome = ReviewOutcome::Approved;
        Ok(ApproveOutcome::Finalized(result))
    }

    /// Reject the current step with the admin's selected reasons.
    ///
    /// Terminates the session; the pointer stays on the rejected step and
    /// later steps are never evaluated.
    pub fn reject_current(&mut self, reasons: &[String]) -> Result<&ReviewStep, ReviewError> {
        self.ensure_decidable()?;

        let reasons = normalize_reasons(reasons);
        if reasons.is_empty() {
            return Err(ReviewError::Validation(
                "Select at least one rejection reason".to_string(),
            ));
        }

        let step = &mut self.steps[self.current_step_index];
        step.status = StepStatus::Rejected;
        step.rejection_reason = Some(reasons.join(REASON_SEPARATOR));
        self.outcome = ReviewOutcome::Rejected;
        Ok(&self.steps[self.current_step_index])
    }

    /// Move the pointer back one step without touching any step status.
    pub fn go_to_previous(&mut self) -> Result<usize, ReviewError> {
        if self.outcome.is_terminal() {
            return Err(ReviewError::Terminal(self.outcome));
        }
        if self.current_step_index == 0 {
            return Err(ReviewError::NoPreviousStep);
        }
        self.current_step_index -= 1;
        Ok(self.current_step_index)
    }

    /// A step is decidable while the session is open and the step is pending,
    /// or approved and being revisited.
    fn ensure_decidable(&self) -> Result<(), ReviewError> {
        if self.outcome.is_terminal() {
            return Err(ReviewError::Terminal(self.outcome));
        }
        let step = self.current_step();
        match step.status {
            StepStatus::Pending | StepStatus::Approved => Ok(()),
            status @ (StepStatus::Rejected | StepStatus::Skipped) => {
                Err(ReviewError::StepNotActionable {
                    step_id: step.id.clone(),
                    status,
                })
            }
        }
    }
}

/// Trim reasons, drop blanks, and collapse duplicates keeping first-seen order.
pub fn normalize_reasons(reasons: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(reasons.len());
    for reason in reasons {
        let trimmed = reason.trim();
        if !trimmed.is_empty() && !out.iter().any(|r| r == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    out
}
