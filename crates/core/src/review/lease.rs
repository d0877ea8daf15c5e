//! Single-reviewer lease and optimistic version checks.
//!
//! Only one administrator may drive a submission's review at a time. The
//! holder claims a lease that expires after a fixed duration unless renewed;
//! every mutation also carries the session version it was based on.

use chrono::Duration;
use serde::Serialize;

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Default lease duration in seconds (15 minutes).
pub const DEFAULT_LEASE_SECS: i64 = 900;

/// An admin's claim on a review session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewLease {
    pub holder: DbId,
    pub expires_at: Timestamp,
}

impl ReviewLease {
    /// A lease for `holder` starting at `now`.
    pub fn grant(holder: DbId, now: Timestamp, duration_secs: i64) -> Self {
        Self {
            holder,
            expires_at: now + Duration::seconds(duration_secs),
        }
    }

    /// Rebuild from the nullable `lease_holder` / `lease_expires_at` columns.
    pub fn from_columns(holder: Option<DbId>, expires_at: Option<Timestamp>) -> Option<Self> {
        match (holder, expires_at) {
            (Some(holder), Some(expires_at)) => Some(Self { holder, expires_at }),
            _ => None,
        }
    }

    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expires_at > now
    }
}

/// Check that `user_id` may claim (or renew) a session guarded by `current`.
pub fn check_claim(
    current: Option<&ReviewLease>,
    user_id: DbId,
    now: Timestamp,
) -> Result<(), CoreError> {
    match current {
        Some(lease) if lease.holder != user_id && lease.is_active(now) => {
            Err(CoreError::Conflict(format!(
                "Submission is being reviewed by user {} until {}",
                lease.holder,
                lease.expires_at.to_rfc3339()
            )))
        }
        _ => Ok(()),
    }
}

/// Check that `user_id` holds an unexpired lease before mutating the session.
pub fn ensure_holder(
    current: Option<&ReviewLease>,
    user_id: DbId,
    now: Timestamp,
) -> Result<(), CoreError> {
    match current {
        Some(lease) if lease.holder == user_id && lease.is_active(now) => Ok(()),
        Some(lease) if lease.holder == user_id => Err(CoreError::Conflict(
            "Your review lease has expired; claim the submission again".to_string(),
        )),
        Some(lease) if lease.is_active(now) => Err(CoreError::Conflict(format!(
            "Submission is being reviewed by user {}",
            lease.holder
        ))),
        _ => Err(CoreError::Conflict(
            "Claim the submission before reviewing it".to_string(),
        )),
    }
}

/// Compare the client's `expected` session version with the stored one.
pub fn ensure_version(expected: i32, actual: i32) -> Result<(), CoreError> {
    if expected == actual {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Review session was modified concurrently (expected version {expected}, found {actual})"
        )))
    }
}
