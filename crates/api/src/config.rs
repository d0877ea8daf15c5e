use std::time::Duration;

use marketplace_core::error::CoreError;
use marketplace_core::review::lease::DEFAULT_LEASE_SECS;
use marketplace_core::review::ReviewPolicy;
use marketplace_harness::{HarnessClient, HarnessError};

use crate::auth::jwt::JwtConfig;

/// Default HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 90;

/// Default timeout for one workflow API call in seconds.
pub const DEFAULT_HARNESS_TIMEOUT_SECS: u64 = 60;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `90`).
    pub request_timeout_secs: u64,
    /// Grace period for in-flight requests on shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Lifetime of a reviewer's claim on a submission (default: `900`).
    pub review_lease_secs: i64,
    /// Optional JSON file replacing the built-in review policy.
    pub review_policy_path: Option<String>,
    /// External workflow test harness settings.
    pub harness: HarnessConfig,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

/// Connection settings for the workflow-execution API.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub base_url: String,
    /// Token used when the reviewer does not supply one per run.
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                      |
    /// |-------------------------|------------------------------|
    /// | `HOST`                  | `0.0.0.0`                    |
    /// | `PORT`                  | `3000`                       |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`      |
    /// | `REQUEST_TIMEOUT_SECS`  | `90`                         |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                         |
    /// | `REVIEW_LEASE_SECS`     | `900`                        |
    /// | `REVIEW_POLICY_PATH`    | unset (built-in policy)      |
    /// | `HARNESS_BASE_URL`      | `https://www.runninghub.cn`  |
    /// | `HARNESS_API_TOKEN`     | unset                        |
    /// | `HARNESS_TIMEOUT_SECS`  | `60`                         |
    ///
    /// Panics if the request timeout does not exceed the harness timeout;
    /// otherwise the timeout layer would cut off an external test run before
    /// its generation task is recorded.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let review_lease_secs: i64 = std::env::var("REVIEW_LEASE_SECS")
            .unwrap_or_else(|_| DEFAULT_LEASE_SECS.to_string())
            .parse()
            .expect("REVIEW_LEASE_SECS must be a valid i64");
        assert!(review_lease_secs > 0, "REVIEW_LEASE_SECS must be positive");

        let review_policy_path = std::env::var("REVIEW_POLICY_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        let harness = HarnessConfig {
            base_url: std::env::var("HARNESS_BASE_URL")
                .unwrap_or_else(|_| "https://www.runninghub.cn".into()),
            api_token: std::env::var("HARNESS_API_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
            timeout_secs: std::env::var("HARNESS_TIMEOUT_SECS")
                .unwrap_or_else(|_| DEFAULT_HARNESS_TIMEOUT_SECS.to_string())
                .parse()
                .expect("HARNESS_TIMEOUT_SECS must be a valid u64"),
        };
        assert!(
            timeouts_leave_room_for_harness(request_timeout_secs, harness.timeout_secs),
            "REQUEST_TIMEOUT_SECS ({request_timeout_secs}) must exceed HARNESS_TIMEOUT_SECS ({})",
            harness.timeout_secs
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            review_lease_secs,
            review_policy_path,
            harness,
            jwt: JwtConfig::from_env(),
        }
    }

    /// The review policy to run with: the configured file, or the built-in
    /// four-step checklist.
    pub fn load_review_policy(&self) -> Result<ReviewPolicy, CoreError> {
        match &self.review_policy_path {
            None => Ok(ReviewPolicy::default()),
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    CoreError::Internal(format!("Cannot read review policy '{path}': {e}"))
                })?;
                ReviewPolicy::from_json(&json)
            }
        }
    }
}

/// Whether a request can outlive the slowest workflow API call it makes.
pub fn timeouts_leave_room_for_harness(request_timeout_secs: u64, harness_timeout_secs: u64) -> bool {
    request_timeout_secs > harness_timeout_secs
}

impl HarnessConfig {
    pub fn build_client(&self) -> Result<HarnessClient, HarnessError> {
        HarnessClient::new(
            self.base_url.clone(),
            self.api_token.clone(),
            Duration::from_secs(self.timeout_secs),
        )
    }
}
