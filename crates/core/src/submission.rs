//! Submission input limits and validation helpers.
//!
//! Used by the API layer before a creator's submission, an admin's review
//! comment, or a reward pool top-up reaches the database.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a submission title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for a submission description.
pub const MAX_DESCRIPTION_LENGTH: usize = 5_000;

/// Maximum length for the embedded API invocation snippet.
pub const MAX_API_CODE_LENGTH: usize = 100_000;

/// Maximum length for an admin's review comment.
pub const MAX_REVIEW_COMMENT_LENGTH: usize = 2_000;

/// Largest single top-up of the reward pool.
pub const MAX_POOL_FUNDING: i64 = 100_000_000;

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Validate the creator-supplied fields of a new submission.
pub fn validate_new_submission(
    title: &str,
    description: Option<&str>,
    api_code: &str,
) -> Result<(), CoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(CoreError::Validation(
            "Submission title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Submission title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }

    if let Some(d) = description {
        if d.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Submission description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
    }

    if api_code.trim().is_empty() {
        return Err(CoreError::Validation(
            "Submission must include the API invocation code".to_string(),
        ));
    }
    if api_code.len() > MAX_API_CODE_LENGTH {
        return Err(CoreError::Validation(format!(
            "API invocation code exceeds maximum length of {MAX_API_CODE_LENGTH} bytes"
        )));
    }

    Ok(())
}

/// Validate an optional review comment attached to an approval or rejection.
pub fn validate_review_comment(comment: Option<&str>) -> Result<(), CoreError> {
    if let Some(c) = comment {
        if c.chars().count() > MAX_REVIEW_COMMENT_LENGTH {
            return Err(CoreError::Validation(format!(
                "Review comment exceeds maximum length of {MAX_REVIEW_COMMENT_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate credits an admin adds to the reward pool.
pub fn validate_pool_funding(amount: i64) -> Result<(), CoreError> {
    if amount <= 0 {
        return Err(CoreError::Validation(format!(
            "Funding amount must be positive, got {amount}"
        )));
    }
    if amount > MAX_POOL_FUNDING {
        return Err(CoreError::Validation(format!(
            "Funding amount exceeds maximum of {MAX_POOL_FUNDING} credits per top-up"
        )));
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
