//! Core types for the tierline cost-aware routing engine.
//!
//! This crate defines the shared data model used across the workspace:
//! provider responses, intent categories, task plans and their status
//! machines, engine configuration, the error taxonomy, and the record
//! types the engine emits for persistence.
//!
//! It deliberately contains no control flow beyond constructors and
//! status-transition checks; the engine logic lives in `tierline-core`
//! and the provider layer in `tierline-llm`.

pub mod config;
pub mod error;
pub mod intent;
pub mod plan;
pub mod record;
pub mod response;

pub use config::{EngineConfig, TierConfig};
pub use error::{ConfigError, EngineError};
pub use intent::{Intent, ParsedIntent};
pub use plan::{FailurePolicy, PlanStatus, StepStatus, TaskPlan, TaskStep};
pub use record::{ConversationTurn, TaskRecord, UserProfile};
pub use response::ModelResponse;
