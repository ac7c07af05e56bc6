//! Task planning: turn a parsed intent into an executable step plan.

use tracing::warn;

use tierline_llm::{GenerateOptions, ModelRouter};
use tierline_types::{Intent, ParsedIntent, PlanStatus, TaskPlan, TaskStep};

use crate::fenced::parse_with_fences;

const PLANNER_SYSTEM: &str = "You are a precise task planner. Output only valid JSON arrays.";

fn planning_prompt(message: &str, intent: Intent) -> String {
    format!(
        "Break the user's request into executable steps.\n\
         \n\
         Available tools: file_manager, web_search, code_tools, calculator, scheduler, system\n\
         Available actions per tool:\n\
         - file_manager: create_file, read_file, edit_file, delete_file, list_files\n\
         - web_search: search, fetch_page\n\
         - code_tools: write_code, debug_code, explain_code\n\
         - calculator: compute, convert_units\n\
         - scheduler: set_reminder, list_scheduled\n\
         - system: status, help\n\
         \n\
         User request: {message}\n\
         Intent: {intent}\n\
         \n\
         Output a JSON array of steps, each with:\n\
         - \"description\": what this step does\n\
         - \"tool\": tool name\n\
         - \"action\": action name\n\
         - \"params\": dict of params\n\
         - \"model_tier\": 1 (simple) to 4 (complex)\n\
         \n\
         Keep it minimal, as few steps as possible.\n\
         Respond with ONLY the JSON array, no other text."
    )
}

/// Build an execution plan for a parsed intent.
///
/// Arithmetic general chat goes straight to the calculator; other
/// simple intents get a single-step plan without a model call. Complex
/// intents are decomposed by the router, falling back to one direct
/// generation step when decomposition fails. Plans always come back
/// `Ready`.
pub async fn create_plan(
    parsed: &ParsedIntent,
    original_message: &str,
    user_id: &str,
    router: &ModelRouter,
) -> TaskPlan {
    let mut plan = TaskPlan::new(user_id, original_message, parsed.intent);

    // Arithmetic before the general-chat fast path, or the calculator
    // would never be reached.
    if parsed.intent == Intent::GeneralChat && is_math_expression(original_message) {
        plan.steps.push(
            TaskStep::new("Calculate the expression", "calculator", "compute")
                .with_param("expression", serde_json::json!(original_message)),
        );
        plan.status = PlanStatus::Ready;
        return plan;
    }

    if matches!(
        parsed.intent,
        Intent::GeneralChat | Intent::Help | Intent::Status | Intent::Feedback
    ) {
        plan.steps.push(simple_step(parsed));
        plan.status = PlanStatus::Ready;
        return plan;
    }

    let options = GenerateOptions {
        complexity_score: i64::from(parsed.complexity_score.min(5)),
        system: Some(PLANNER_SYSTEM.to_string()),
        max_tokens: 500,
        temperature: 0.3,
        ..GenerateOptions::default()
    };
    let response = router
        .generate(&planning_prompt(original_message, parsed.intent), &options)
        .await;

    if response.success {
        match parse_with_fences(&response.text) {
            Ok(serde_json::Value::Array(steps_data)) => {
                for (i, step_data) in steps_data.iter().enumerate() {
                    plan.steps.push(step_from_json(step_data, i, parsed));
                }
            }
            Ok(_) => warn!("planner response was not a JSON array, using fallback step"),
            Err(err) => {
                warn!(error = %err, "planner response was not valid JSON, using fallback step");
            }
        }
    }

    if plan.steps.is_empty() {
        plan.steps.push(
            TaskStep::new(
                format!("Process: {original_message}"),
                "llm_direct",
                "generate",
            )
            .with_param("prompt", serde_json::json!(original_message))
            .with_tier(parsed.recommended_tier),
        );
    }

    plan.status = PlanStatus::Ready;
    plan
}

fn simple_step(parsed: &ParsedIntent) -> TaskStep {
    match parsed.intent {
        Intent::Help => TaskStep::new("Show help information", "system", "help"),
        Intent::Status => TaskStep::new("Show system status", "system", "status"),
        _ => TaskStep::new("Respond to user", "llm_direct", "generate")
            .with_tier(parsed.recommended_tier),
    }
}

fn step_from_json(data: &serde_json::Value, index: usize, parsed: &ParsedIntent) -> TaskStep {
    let text = |key: &str| {
        data.get(key)
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string()
    };

    let description = data
        .get("description")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Step {}", index + 1));

    let tier = data
        .get("model_tier")
        .and_then(|v| v.as_i64())
        .map(|t| t.clamp(1, 4) as u8)
        .unwrap_or(parsed.recommended_tier);

    let mut step = TaskStep::new(description, text("tool"), text("action")).with_tier(tier);
    if let Some(params) = data.get("params").and_then(|v| v.as_object()) {
        step.params = params.clone();
    }
    step
}

/// Whether the text is purely an arithmetic expression.
fn is_math_expression(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| c.is_ascii_digit() || " +-*/().^%".contains(c))
}
