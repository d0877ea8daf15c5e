//! Extraction of the workflow id from a submission's invocation snippet.

use std::sync::LazyLock;

use regex::Regex;

/// `"workflow_id": "123"`, `'workflowId': 123`, `workflow_id=123` and the like.
static WORKFLOW_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)["']?workflow_?id["']?\s*[:=]\s*["']?([A-Za-z0-9_-]+)"#)
        .expect("valid regex")
});

/// Pull the first workflow id out of `api_code`.
///
/// Submissions embed a ready-to-run call (JSON body, curl line or query
/// string) rather than a bare id, so the id is located textually.
pub fn extract_workflow_id(api_code: &str) -> Option<String> {
    WORKFLOW_ID_RE
        .captures(api_code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
