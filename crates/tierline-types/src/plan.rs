//! Task plans, their steps, and the status machines both move through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::intent::Intent;

/// Lifecycle of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl StepStatus {
    /// Whether this status may move to `next`.
    ///
    /// Pending goes to Running or Failed (a failed dependency skips the
    /// step without ever running it). Running goes to Completed or
    /// Failed. Completed and Failed are terminal.
    pub fn can_transition(self, next: StepStatus) -> bool {
        matches!(
            (self, next),
            (StepStatus::Pending, StepStatus::Running)
                | (StepStatus::Pending, StepStatus::Failed)
                | (StepStatus::Running, StepStatus::Completed)
                | (StepStatus::Running, StepStatus::Failed)
        )
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Lifecycle of a whole plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Planning,
    Ready,
    Executing,
    Completed,
    Failed,
}

impl PlanStatus {
    /// Whether this status may move to `next`.
    pub fn can_transition(self, next: PlanStatus) -> bool {
        matches!(
            (self, next),
            (PlanStatus::Planning, PlanStatus::Ready)
                | (PlanStatus::Ready, PlanStatus::Executing)
                | (PlanStatus::Executing, PlanStatus::Completed)
                | (PlanStatus::Executing, PlanStatus::Failed)
        )
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PlanStatus::Planning => "planning",
            PlanStatus::Ready => "ready",
            PlanStatus::Executing => "executing",
            PlanStatus::Completed => "completed",
            PlanStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// What the executor should do when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Retry at a higher model tier.
    Escalate,
    /// Retry at the same tier.
    Retry,
    /// Stop and surface the failure to the user.
    AskHuman,
    /// Mark failed and continue with the remaining steps.
    Skip,
}

/// One unit of work inside a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskStep {
    /// Short unique id, referenced by `depends_on` in sibling steps.
    pub id: String,
    /// Human-readable description of the step.
    pub description: String,
    /// Tool name this step dispatches to ("llm_direct", "system", or a
    /// registry tool).
    pub tool: String,
    /// Action within the tool.
    pub action: String,
    /// Action parameters.
    pub params: serde_json::Map<String, serde_json::Value>,
    /// Model tier to use when the step needs a model, 1-4.
    pub model_tier: u8,
    /// Ids of steps that must complete before this one runs.
    pub depends_on: Vec<String>,
    /// Remaining retry budget.
    pub retry_count: u32,
    /// Per-step timeout.
    pub timeout_secs: u64,
    /// Failure handling policy.
    pub on_failure: FailurePolicy,
    /// Current status.
    pub status: StepStatus,
    /// Output text once completed.
    pub result: String,
    /// Error text once failed.
    pub error: String,
}

impl TaskStep {
    /// Create a pending step with default retry budget, timeout, and
    /// escalation policy. The id is the first eight hex chars of a v4
    /// uuid, enough to reference within a single plan.
    pub fn new(
        description: impl Into<String>,
        tool: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string()[..8].to_string(),
            description: description.into(),
            tool: tool.into(),
            action: action.into(),
            params: serde_json::Map::new(),
            model_tier: 1,
            depends_on: Vec::new(),
            retry_count: 2,
            timeout_secs: 60,
            on_failure: FailurePolicy::Escalate,
            status: StepStatus::Pending,
            result: String::new(),
            error: String::new(),
        }
    }

    /// Set the model tier.
    pub fn with_tier(mut self, tier: u8) -> Self {
        self.model_tier = tier;
        self
    }

    /// Set a parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.params.insert(key.into(), value);
        self
    }

    /// Add a dependency on another step's id.
    pub fn depends_on(mut self, id: impl Into<String>) -> Self {
        self.depends_on.push(id.into());
        self
    }
}

/// An ordered plan of steps for one user request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskPlan {
    /// Plan id, a full v4 uuid.
    pub id: String,
    /// The requesting user.
    pub user_id: String,
    /// The message the plan was built from.
    pub original_message: String,
    /// Classified intent of the message.
    pub intent: Intent,
    /// Steps in execution order.
    pub steps: Vec<TaskStep>,
    /// Planner's cost estimate in USD.
    pub estimated_cost: f64,
    /// Planner's wall-clock estimate.
    pub estimated_time_secs: u64,
    /// Current status.
    pub status: PlanStatus,
    /// When the plan was created.
    pub created_at: DateTime<Utc>,
    /// When execution finished, either way.
    pub completed_at: Option<DateTime<Utc>>,
    /// Actual accumulated cost in USD, filled in by the executor.
    pub total_cost: f64,
}

impl TaskPlan {
    /// Create an empty plan in the Planning state.
    pub fn new(
        user_id: impl Into<String>,
        original_message: impl Into<String>,
        intent: Intent,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            original_message: original_message.into(),
            intent,
            steps: Vec::new(),
            estimated_cost: 0.0,
            estimated_time_secs: 0,
            status: PlanStatus::Planning,
            created_at: Utc::now(),
            completed_at: None,
            total_cost: 0.0,
        }
    }

    /// Look up a step by id.
    pub fn step(&self, id: &str) -> Option<&TaskStep> {
        self.steps.iter().find(|s| s.id == id)
    }
}
