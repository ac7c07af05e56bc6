//! Records the engine emits for its persistence collaborator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::plan::{PlanStatus, TaskPlan};

/// A user profile as the engine knows it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    /// Role inferred from usage patterns ("developer", "student", ...).
    pub detected_role: String,
    /// Primary language code for responses.
    pub primary_language: String,
    pub preferred_channel: String,
    pub timezone: String,
}

/// Summary of one executed plan, emitted for task history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task_id: String,
    pub user_id: String,
    pub original_message: String,
    /// Intent wire name.
    pub intent: String,
    pub status: PlanStatus,
    /// Final user-facing result text.
    pub result: String,
    pub cost_usd: f64,
    pub duration_secs: u64,
    /// Distinct model tiers the steps used, ascending.
    pub model_tiers_used: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Summarize an executed plan.
    pub fn from_plan(plan: &TaskPlan, result: impl Into<String>) -> Self {
        let duration_secs = plan
            .completed_at
            .map(|done| (done - plan.created_at).num_seconds().max(0) as u64)
            .unwrap_or(0);

        let mut tiers: Vec<u8> = plan.steps.iter().map(|s| s.model_tier).collect();
        tiers.sort_unstable();
        tiers.dedup();

        Self {
            task_id: plan.id.clone(),
            user_id: plan.user_id.clone(),
            original_message: plan.original_message.clone(),
            intent: plan.intent.to_string(),
            status: plan.status,
            result: result.into(),
            cost_usd: plan.total_cost,
            duration_secs,
            model_tiers_used: tiers,
            created_at: plan.created_at,
            completed_at: plan.completed_at,
        }
    }
}

/// One conversation turn, emitted for conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub user_id: String,
    /// "user" or "assistant".
    pub role: String,
    pub content: String,
    /// Channel the turn arrived on (e.g. "cli", "chat").
    pub channel: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn new(
        user_id: impl Into<String>,
        role: impl Into<String>,
        content: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role: role.into(),
            content: content.into(),
            channel: channel.into(),
            timestamp: Utc::now(),
        }
    }
}
