//! Multi-step submission review workflow.
//!
//! An administrator walks a submission through the ordered steps of a
//! [`ReviewPolicy`]. Any rejected step terminates the review; approving the
//! last step hands off to a [`Finalizer`] that publishes the work item and
//! pays the submitter. Traversal is strictly linear: no branching and no
//! parallel steps.
//!
//! - [`step`] -- step records, step status, and the aggregate outcome.
//! - [`policy`] -- the step registry and rejection reason catalog.
//! - [`executor`] -- the [`ReviewSession`] state machine.
//! - [`finalization`] -- the contract the last approval depends on.
//! - [`lease`] -- single-reviewer lease and optimistic version checks.

pub mod error;
pub mod executor;
pub mod finalization;
pub mod lease;
pub mod policy;
pub mod step;

pub use error::ReviewError;
pub use executor::{ApproveOutcome, ReviewSession};
pub use finalization::{FinalizationRequest, FinalizationResult, Finalizer};
pub use lease::ReviewLease;
pub use policy::{get_default_steps, get_rejection_options, ReviewPolicy, StepDefinition};
pub use step::{ReviewOutcome, ReviewStep, StepStatus};
