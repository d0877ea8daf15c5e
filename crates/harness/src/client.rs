//! REST client for the workflow-execution API.
//!
//! Wraps `POST /v1/workflow/run` using [`reqwest`]. The provider answers
//! with an envelope of the form `{ "code": 0, "msg": "...", "data": {...} }`;
//! any non-zero `code` is treated the same as a non-2xx status.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// HTTP client for the workflow-execution API.
pub struct HarnessClient {
    client: reqwest::Client,
    base_url: String,
    default_token: Option<String>,
}

/// Input of one external test run.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalTestRequest {
    pub workflow_id: String,
    /// Admin-supplied test parameter values, passed through unchanged.
    pub parameters: Value,
    /// Token for this run; falls back to the client's default token.
    #[serde(skip)]
    pub auth_token: Option<String>,
}

/// What the reviewer gets back from a run.
#[derive(Debug, Clone, Serialize)]
pub struct ExternalTestResponse {
    /// Async execution handle, present when the provider queued a job.
    pub execute_id: Option<String>,
    pub debug_url: Option<String>,
    pub raw_response: Value,
}

/// Errors from the workflow-execution API layer.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status or a non-zero `code`.
    #[error("Workflow API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// No token was given for the run and no default is configured.
    #[error("No API token configured for the workflow test harness")]
    MissingToken,
}

impl HarnessClient {
    /// Create a client with its own connection pool.
    ///
    /// * `base_url` - Provider base URL, e.g. `https://api.example.com`.
    /// * `default_token` - Token used when a run does not bring its own.
    /// * `timeout` - Per-request timeout.
    pub fn new(
        base_url: String,
        default_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HarnessError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, default_token))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: String,
        default_token: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_token,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Run a workflow once with the given test parameters.
    pub async fn run_workflow(
        &self,
        request: &ExternalTestRequest,
    ) -> Result<ExternalTestResponse, HarnessError> {
        let token = request
            .auth_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .or(self.default_token.as_deref())
            .ok_or(HarnessError::MissingToken)?;

        let response = self
            .client
            .post(format!("{}/v1/workflow/run", self.base_url))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let result = interpret_response(status, &body);

        match &result {
            Ok(run) => tracing::info!(
                workflow_id = %request.workflow_id,
                execute_id = ?run.execute_id,
                "External workflow test run accepted"
            ),
            Err(e) => tracing::warn!(
                workflow_id = %request.workflow_id,
                error = %e,
                "External workflow test run failed"
            ),
        }
        result
    }
}

// ---- response interpretation ----

/// Turn a raw provider response into a run result.
///
/// A non-JSON 2xx body is kept verbatim as a JSON string so the reviewer
/// still sees it.
pub fn interpret_response(status: u16, body: &str) -> Result<ExternalTestResponse, HarnessError> {
    if !(200..300).contains(&status) {
        return Err(HarnessError::Api {
            status,
            body: body.to_string(),
        });
    }

    let raw: Value =
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()));

    if let Some(code) = raw.get("code").and_then(Value::as_i64) {
        if code != 0 {
            return Err(HarnessError::Api {
                status,
                body: body.to_string(),
            });
        }
    }

    Ok(ExternalTestResponse {
        execute_id: find_string(&raw, &["execute_id", "executeId", "task_id", "taskId"]),
        debug_url: find_string(&raw, &["debug_url", "debugUrl"]),
        raw_response: raw,
    })
}

/// Look up the first of `keys` in `data`, then at the top level.
///
/// Numeric values are rendered as strings.
fn find_string(raw: &Value, keys: &[&str]) -> Option<String> {
    let scopes = [raw.get("data"), Some(raw)];
    scopes.into_iter().flatten().find_map(|scope| {
        keys.iter().find_map(|key| match scope.get(*key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    })
}
