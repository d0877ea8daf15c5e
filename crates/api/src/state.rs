use std::sync::Arc;

use marketplace_core::review::ReviewPolicy;
use marketplace_harness::HarnessClient;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: marketplace_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Active review policy, loaded once at startup.
    pub policy: Arc<ReviewPolicy>,
    /// Client for the external workflow test harness.
    pub harness: Arc<HarnessClient>,
}
