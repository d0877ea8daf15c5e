//! HTTP handlers, grouped by resource.

pub mod external_test;
pub mod review;
pub mod review_policy;
pub mod reward_pool;
pub mod submission;
