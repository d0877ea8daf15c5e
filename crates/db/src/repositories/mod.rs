//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods that must run inside
//! a caller-owned transaction take `&mut PgConnection` instead.

pub mod balance_transaction_repo;
pub mod finalization_repo;
pub mod generation_task_repo;
pub mod review_session_repo;
pub mod submission_repo;
pub mod user_repo;
pub mod work_item_repo;

pub use balance_transaction_repo::BalanceTransactionRepo;
pub use finalization_repo::PgFinalizer;
pub use generation_task_repo::GenerationTaskRepo;
pub use review_session_repo::ReviewSessionRepo;
pub use submission_repo::SubmissionRepo;
pub use user_repo::UserRepo;
pub use work_item_repo::WorkItemRepo;
