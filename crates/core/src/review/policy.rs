//! Review step registry and rejection reason catalog.
//!
//! A [`ReviewPolicy`] is a small declarative table: step id, display text,
//! the reasons an admin may cite when failing that step, and whether the
//! step runs the external test harness. The built-in policy mirrors the
//! four-step checklist of the admin back office; a JSON file with the same
//! shape may replace it at startup.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::step::{
    ReviewStep, StepStatus, STEP_BASIC_INFO_CHECK, STEP_EXTERNAL_API_TEST, STEP_FINAL_APPROVAL,
    STEP_WORKFLOW_FILE_CHECK,
};
use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Reason offered for a step id the policy does not know ("review not passed").
pub const FALLBACK_REJECTION_REASON: &str = "审核不通过";

/// Separator used when joining selected reasons into `rejection_reason`.
pub const REASON_SEPARATOR: &str = "；";

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// Static definition of one review step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rejection_reasons: Vec<String>,
    #[serde(default)]
    pub runs_external_test: bool,
}

impl StepDefinition {
    fn new(id: &str, name: &str, description: &str, reasons: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            rejection_reasons: reasons.iter().map(|r| r.to_string()).collect(),
            runs_external_test: false,
        }
    }

    fn with_external_test(mut self) -> Self {
        self.runs_external_test = true;
        self
    }

    /// A fresh `pending` step instance of this definition.
    pub fn instantiate(&self) -> ReviewStep {
        ReviewStep {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            status: StepStatus::Pending,
            rejection_reason: None,
            runs_external_test: self.runs_external_test,
        }
    }
}

/// Ordered review steps plus their rejection catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewPolicy {
    steps: Vec<StepDefinition>,
}

/// On-disk shape of a policy file.
#[derive(Debug, Deserialize)]
struct PolicyFile {
    steps: Vec<StepDefinition>,
}

/* --------------------------------------------------------------------------
Policy
-------------------------------------------------------------------------- */

impl ReviewPolicy {
    /// Build a policy, validating that it describes a usable linear checklist.
    pub fn new(steps: Vec<StepDefinition>) -> Result<Self, CoreError> {
        if steps.is_empty() {
            return Err(CoreError::Validation(
                "Review policy must define at least one step".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for step in &steps {
            if step.id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "Review step id must not be empty".to_string(),
                ));
            }
            if !seen.insert(step.id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate review step id '{}'",
                    step.id
                )));
            }
            if step.rejection_reasons.iter().all(|r| r.trim().is_empty()) {
                return Err(CoreError::Validation(format!(
                    "Review step '{}' must list at least one rejection reason",
                    step.id
                )));
            }
        }

        let external = steps.iter().filter(|s| s.runs_external_test).count();
        if external > 1 {
            return Err(CoreError::Validation(format!(
                "At most one review step may run the external test, found {external}"
            )));
        }

        Ok(Self { steps })
    }

    /// Parse and validate a policy from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let file: PolicyFile = serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid review policy JSON: {e}")))?;
        Self::new(file.steps)
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step(&self, step_id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    /// The step during which the external test harness may run, if any.
    pub fn external_test_step(&self) -> Option<&StepDefinition> {
        self.steps.iter().find(|s| s.runs_external_test)
    }

    /// All steps of this policy, in order, each `pending`.
    pub fn default_steps(&self) -> Vec<ReviewStep> {
        self.steps.iter().map(StepDefinition::instantiate).collect()
    }

    /// Ordered rejection reasons for `step_id`.
    ///
    /// Unknown ids yield the single [`FALLBACK_REJECTION_REASON`].
    pub fn rejection_options(&self, step_id: &str) -> Vec<String> {
        match self.step(step_id) {
            Some(step) => step.rejection_reasons.clone(),
            None => vec![FALLBACK_REJECTION_REASON.to_string()],
        }
    }
}

impl Default for ReviewPolicy {
    fn default() -> Self {
        Self {
            steps: vec![
                StepDefinition::new(
                    STEP_BASIC_INFO_CHECK,
                    "基本信息检查",
                    "检查标题、描述、封面与分类等基本信息是否完整准确",
                    &[
                        "标题不规范或与内容不符",
                        "描述信息不完整",
                        "封面图片不清晰或不合规",
                        "分类选择错误",
                        "包含违规或敏感内容",
                    ],
                ),
                StepDefinition::new(
                    STEP_WORKFLOW_FILE_CHECK,
                    "工作流文件检查",
                    "检查工作流文件与 API 调用代码是否完整可用",
                    &[
                        "工作流文件缺失或无法打开",
                        "API 调用代码格式错误",
                        "缺少必要的参数说明",
                        "工作流 ID 与文件不匹配",
                    ],
                ),
                StepDefinition::new(
                    STEP_EXTERNAL_API_TEST,
                    "API 接口测试",
                    "使用测试参数调用工作流接口，人工核对返回结果",
                    &[
                        "接口调用失败",
                        "测试参数不完整",
                        "返回结果与描述不符",
                        "运行超时",
                        "输出质量不达标",
                    ],
                )
                .with_external_test(),
                StepDefinition::new(
                    STEP_FINAL_APPROVAL,
                    "最终审核",
                    "确认审核结论，发布作品并发放奖励",
                    &[
                        "综合评估未达到上架标准",
                        "与已有作品重复",
                        "存在版权风险",
                    ],
                ),
            ],
        }
    }
}

/* --------------------------------------------------------------------------
Built-in policy shortcuts
-------------------------------------------------------------------------- */

/// The built-in four-step checklist, every step `pending`.
pub fn get_default_steps() -> Vec<ReviewStep> {
    ReviewPolicy::default().default_steps()
}

/// Rejection reasons of the built-in policy for `step_id`.
pub fn get_rejection_options(step_id: &str) -> Vec<String> {
    ReviewPolicy::default().rejection_options(step_id)
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn def(id: &str) -> StepDefinition {
        StepDefinition::new(id, id, "", &["reason"])
    }

    #[test]
    fn test_default_steps_order_and_status() {
        let steps = get_default_steps();
        let ids: Vec<&str> = steps.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                STEP_BASIC_INFO_CHECK,
                STEP_WORKFLOW_FILE_CHECK,
                STEP_EXTERNAL_API_TEST,
                STEP_FINAL_APPROVAL
            ]
        );
        assert!(steps.iter().all(|s| s.status == StepStatus::Pending));
        assert!(steps.iter().all(|s| s.rejection_reason.is_none()));
    }

    #[test]
    fn test_only_api_test_step_runs_harness() {
        let policy = ReviewPolicy::default();
        let external = policy.external_test_step().unwrap();
        assert_eq!(external.id, STEP_EXTERNAL_API_TEST);
        let flagged: Vec<_> = get_default_steps()
            .into_iter()
            .filter(|s| s.runs_external_test)
            .collect();
        assert_eq!(flagged.len(), 1);
    }

    #[test]
    fn test_rejection_options_for_known_step() {
        let options = get_rejection_options(STEP_EXTERNAL_API_TEST);
        assert!(options.contains(&"测试参数不完整".to_string()));
        assert_eq!(options[0], "接口调用失败");
    }

    #[test]
    fn test_unknown_step_gets_fallback_reason() {
        assert_eq!(
            get_rejection_options("no_such_step"),
            vec![FALLBACK_REJECTION_REASON.to_string()]
        );
    }

    #[test]
    fn test_empty_policy_rejected() {
        assert_matches!(ReviewPolicy::new(vec![]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_duplicate_step_ids_rejected() {
        let result = ReviewPolicy::new(vec![def("a"), def("a")]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("Duplicate"));
    }

    #[test]
    fn test_step_without_reasons_rejected() {
        let mut step = def("a");
        step.rejection_reasons = vec!["  ".to_string()];
        assert_matches!(ReviewPolicy::new(vec![step]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn test_two_external_test_steps_rejected() {
        let result = ReviewPolicy::new(vec![
            def("a").with_external_test(),
            def("b").with_external_test(),
        ]);
        assert_matches!(result, Err(CoreError::Validation(msg)) if msg.contains("external test"));
    }

    #[test]
    fn test_policy_from_json() {
        let json = r#"{
            "steps": [
                {"id": "intro", "name": "Intro", "description": "d", "rejection_reasons": ["bad intro"]},
                {"id": "run", "name": "Run", "description": "d", "rejection_reasons": ["crashed"], "runs_external_test": true}
            ]
        }"#;
        let policy = ReviewPolicy::from_json(json).unwrap();
        assert_eq!(policy.steps().len(), 2);
        assert_eq!(policy.external_test_step().unwrap().id, "run");
        assert_eq!(policy.rejection_options("intro"), vec!["bad intro".to_string()]);
    }

    #[test]
    fn test_malformed_policy_json_rejected() {
        assert_matches!(
            ReviewPolicy::from_json("{\"steps\": 3}"),
            Err(CoreError::Validation(msg)) if msg.contains("Invalid review policy JSON")
        );
    }
}
