//! Plan execution: sequential steps, dependency gating, model fallback.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use tierline_llm::{GenerateOptions, ModelRouter};
use tierline_types::{EngineError, PlanStatus, StepStatus, TaskPlan, TaskStep};

use crate::tools::ToolRegistry;

const ASSISTANT_SYSTEM: &str = "You are a helpful assistant. Respond concisely and helpfully. \
     If the user asks you to do something, either do it or explain what you'd do.";

const HELP_TEXT: &str = "I can help you with:\n\n\
     - Code: write, debug, explain code\n\
     - Search: find information on the web\n\
     - Files: create, read, edit files\n\
     - Documents: create DOCX, PDF, XLSX, PPTX\n\
     - Math: calculate expressions, convert units\n\
     - Reminders: set reminders and schedules\n\
     - Git: commit, push, create PRs\n\n\
     Just tell me what you need!";

/// Executes task plans step by step.
///
/// Steps run sequentially in plan order. A step whose declared
/// dependency exists and did not complete is failed outright without
/// running. Tool failures fall back to direct model generation, which
/// itself escalates through tiers inside the router.
pub struct TaskExecutor {
    router: Arc<ModelRouter>,
    tools: Arc<ToolRegistry>,
}

impl TaskExecutor {
    pub fn new(router: Arc<ModelRouter>, tools: Arc<ToolRegistry>) -> Self {
        Self { router, tools }
    }

    /// Run every step of the plan and return the final result text.
    ///
    /// The plan ends `Failed` only when every step failed; any
    /// completed step leaves it `Completed`. The final result is the
    /// output of the last completed step.
    pub async fn execute_plan(&self, plan: &mut TaskPlan) -> String {
        plan.status = PlanStatus::Executing;
        let mut completed: HashMap<String, String> = HashMap::new();
        let mut final_result = String::new();

        for index in 0..plan.steps.len() {
            if let Some(unmet) = self.unmet_dependency(&plan.steps, index) {
                let step = &mut plan.steps[index];
                let err = EngineError::DependencyUnmet(format!("step {unmet} did not complete"));
                warn!(step_id = %step.id, dependency = %unmet, "skipping step");
                step.status = StepStatus::Failed;
                step.error = err.to_string();
                continue;
            }

            let original_message = plan.original_message.clone();
            let step = &mut plan.steps[index];
            info!(
                step_id = %step.id,
                tool = %step.tool,
                action = %step.action,
                tier = step.model_tier,
                "executing step"
            );
            let result = self.execute_step(step, &original_message).await;

            if step.status == StepStatus::Completed {
                completed.insert(step.id.clone(), result.clone());
                final_result = result;
            }
        }

        let all_failed = !plan.steps.is_empty()
            && plan.steps.iter().all(|s| s.status == StepStatus::Failed);
        plan.status = if all_failed {
            PlanStatus::Failed
        } else {
            PlanStatus::Completed
        };
        plan.completed_at = Some(Utc::now());
        plan.total_cost = self.router.total_cost();

        final_result
    }

    /// The id of the first dependency of `steps[index]` that exists in
    /// the plan and is not completed. Ids matching no step are ignored.
    fn unmet_dependency(&self, steps: &[TaskStep], index: usize) -> Option<String> {
        steps[index].depends_on.iter().cloned().find(|dep_id| {
            steps
                .iter()
                .any(|s| s.id == *dep_id && s.status != StepStatus::Completed)
        })
    }

    async fn execute_step(&self, step: &mut TaskStep, original_message: &str) -> String {
        step.status = StepStatus::Running;

        if step.tool == "llm_direct" {
            return self.execute_llm_direct(step, original_message).await;
        }
        if step.tool == "system" {
            return self.execute_system(step);
        }

        if let Some(tool) = self.tools.get(&step.tool) {
            match tool.execute(&step.action, &step.params).await {
                Ok(result) => {
                    step.status = StepStatus::Completed;
                    step.result = result.data.clone();
                    return result.data;
                }
                Err(err) => {
                    warn!(
                        step_id = %step.id,
                        tool = %step.tool,
                        error = %err,
                        "tool failed, falling back to model"
                    );
                    step.error = err.to_string();
                }
            }
        } else {
            warn!(step_id = %step.id, tool = %step.tool, "tool not registered, falling back to model");
        }

        self.execute_llm_direct(step, original_message).await
    }

    async fn execute_llm_direct(&self, step: &mut TaskStep, original_message: &str) -> String {
        let prompt = step
            .params
            .get("prompt")
            .and_then(|v| v.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(original_message);

        let options = GenerateOptions {
            // Rough inverse of the tier bands, so a tier-N step starts
            // near tier N.
            complexity_score: i64::from(step.model_tier) * 2,
            system: Some(ASSISTANT_SYSTEM.to_string()),
            ..GenerateOptions::default()
        };
        let response = self.router.generate(prompt, &options).await;

        if response.success {
            step.status = StepStatus::Completed;
            step.result = response.text.clone();
            response.text
        } else {
            step.status = StepStatus::Failed;
            step.error = response
                .error
                .unwrap_or_else(|| "generation failed".to_string());
            format!("Sorry, I couldn't complete this task. Error: {}", step.error)
        }
    }

    fn execute_system(&self, step: &mut TaskStep) -> String {
        step.status = StepStatus::Completed;
        step.result = match step.action.as_str() {
            "help" => HELP_TEXT.to_string(),
            "status" => format!(
                "Status\n\n- Version: {}\n- Session cost: ${:.4}\n- Running\n",
                env!("CARGO_PKG_VERSION"),
                self.router.total_cost()
            ),
            _ => "Unknown system command".to_string(),
        };
        step.result.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tierline_llm::provider::{GenerateRequest, Provider};
    use tierline_types::{Intent, ModelResponse};

    use crate::tools::{CalculatorTool, Tool, ToolError, ToolResult};

    struct EchoProvider;

    #[async_trait]
    impl Provider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }
        fn model(&self) -> &str {
            "echo-1"
        }
        async fn generate(&self, request: &GenerateRequest) -> ModelResponse {
            ModelResponse::success(format!("echo: {}", request.prompt), "echo", "echo-1")
                .with_usage(5, 5, 0.001)
        }
        async fn classify(
            &self,
            _text: &str,
            categories: &[String],
            _system: &str,
        ) -> ModelResponse {
            ModelResponse::success(categories[0].clone(), "echo", "echo-1")
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn name(&self) -> &str {
            "broken"
        }
        fn description(&self) -> &str {
            "always fails"
        }
        fn actions(&self) -> &[&str] {
            &["anything"]
        }
        async fn execute(
            &self,
            _action: &str,
            _params: &serde_json::Map<String, serde_json::Value>,
        ) -> Result<ToolResult, ToolError> {
            Err(ToolError::ExecutionFailed("kaput".to_string()))
        }
    }

    fn executor_with_echo() -> TaskExecutor {
        let mut router = ModelRouter::new();
        router.register(1, Arc::new(EchoProvider));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CalculatorTool));
        tools.register(Arc::new(BrokenTool));
        TaskExecutor::new(Arc::new(router), Arc::new(tools))
    }

    fn executor_without_providers() -> TaskExecutor {
        TaskExecutor::new(Arc::new(ModelRouter::new()), Arc::new(ToolRegistry::new()))
    }

    #[tokio::test]
    async fn llm_direct_step_completes() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "tell me a joke", Intent::GeneralChat);
        plan.steps
            .push(TaskStep::new("Respond to user", "llm_direct", "generate"));

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: tell me a joke");
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
        assert!(plan.completed_at.is_some());
        assert!(plan.total_cost > 0.0);
    }

    #[tokio::test]
    async fn prompt_param_overrides_original_message() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "original", Intent::GeneralChat);
        plan.steps.push(
            TaskStep::new("custom", "llm_direct", "generate")
                .with_param("prompt", serde_json::json!("override")),
        );

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: override");
    }

    #[tokio::test]
    async fn calculator_step_runs_through_registry() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "2 + 2", Intent::GeneralChat);
        plan.steps.push(
            TaskStep::new("Calculate", "calculator", "compute")
                .with_param("expression", serde_json::json!("2 + 2")),
        );

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "2 + 2 = 4");
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
    }

    #[tokio::test]
    async fn failing_tool_falls_back_to_model() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "do the thing", Intent::GeneralChat);
        plan.steps
            .push(TaskStep::new("Break", "broken", "anything"));

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: do the thing");
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
    }

    #[tokio::test]
    async fn unregistered_tool_falls_back_to_model() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "search things", Intent::WebSearch);
        plan.steps
            .push(TaskStep::new("Search", "web_search", "search"));

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: search things");
    }

    #[tokio::test]
    async fn unmet_dependency_skips_step() {
        let executor = executor_without_providers();
        let mut plan = TaskPlan::new("u1", "two steps", Intent::WriteCode);
        let first = TaskStep::new("fails", "llm_direct", "generate");
        let first_id = first.id.clone();
        let second =
            TaskStep::new("needs first", "llm_direct", "generate").depends_on(first_id.clone());
        plan.steps.push(first);
        plan.steps.push(second);

        executor.execute_plan(&mut plan).await;
        // No providers: the first step fails, so the second is skipped
        // without running and the whole plan is failed.
        assert_eq!(plan.steps[0].status, StepStatus::Failed);
        assert_eq!(plan.steps[1].status, StepStatus::Failed);
        assert!(plan.steps[1].error.contains(&first_id));
        assert!(plan.steps[1].error.contains("dependency not met"));
        assert_eq!(plan.status, PlanStatus::Failed);
    }

    #[tokio::test]
    async fn nonexistent_dependency_id_is_ignored() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "hello", Intent::GeneralChat);
        plan.steps.push(
            TaskStep::new("Respond", "llm_direct", "generate").depends_on("doesnotexist"),
        );

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: hello");
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
    }

    #[tokio::test]
    async fn partial_success_is_completed() {
        let mut router = ModelRouter::new();
        router.register(1, Arc::new(EchoProvider));
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(CalculatorTool));
        let executor = TaskExecutor::new(Arc::new(router), Arc::new(tools));

        let mut plan = TaskPlan::new("u1", "mixed", Intent::GeneralChat);
        let bad = TaskStep::new("bad math", "calculator", "compute")
            .with_param("expression", serde_json::json!("1 / 0"));
        let bad_id = bad.id.clone();
        plan.steps.push(bad);
        plan.steps
            .push(TaskStep::new("depends on bad", "llm_direct", "generate").depends_on(bad_id));
        plan.steps
            .push(TaskStep::new("independent", "llm_direct", "generate"));

        let result = executor.execute_plan(&mut plan).await;
        // Step 1: calculator fails, falls back to the echo model and
        // completes. Only a plan where everything failed is failed.
        assert_eq!(plan.steps[0].status, StepStatus::Completed);
        assert_eq!(plan.status, PlanStatus::Completed);
        assert_eq!(result, "echo: mixed");
    }

    #[tokio::test]
    async fn all_steps_failed_marks_plan_failed() {
        let executor = executor_without_providers();
        let mut plan = TaskPlan::new("u1", "doomed", Intent::GeneralChat);
        plan.steps
            .push(TaskStep::new("a", "llm_direct", "generate"));
        plan.steps
            .push(TaskStep::new("b", "llm_direct", "generate"));

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(plan.status, PlanStatus::Failed);
        assert!(result.contains("couldn't complete"));
        assert!(plan.steps.iter().all(|s| s.status == StepStatus::Failed));
    }

    #[tokio::test]
    async fn system_help_and_status() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "help", Intent::Help);
        plan.steps.push(TaskStep::new("help", "system", "help"));
        let result = executor.execute_plan(&mut plan).await;
        assert!(result.contains("I can help you with"));

        let mut plan = TaskPlan::new("u1", "status", Intent::Status);
        plan.steps.push(TaskStep::new("status", "system", "status"));
        let result = executor.execute_plan(&mut plan).await;
        assert!(result.contains("Session cost"));
    }

    #[tokio::test]
    async fn final_result_comes_from_last_completed_step() {
        let executor = executor_with_echo();
        let mut plan = TaskPlan::new("u1", "multi", Intent::WriteCode);
        plan.steps.push(
            TaskStep::new("first", "llm_direct", "generate")
                .with_param("prompt", serde_json::json!("one")),
        );
        plan.steps.push(
            TaskStep::new("second", "llm_direct", "generate")
                .with_param("prompt", serde_json::json!("two")),
        );

        let result = executor.execute_plan(&mut plan).await;
        assert_eq!(result, "echo: two");
    }
}
