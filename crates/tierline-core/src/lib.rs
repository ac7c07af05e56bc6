//! Engine logic for the tierline cost-aware routing engine.
//!
//! The request pipeline runs: language detection, complexity scoring,
//! intent classification, planning, execution, verification.
//!
//! - [`language`] and [`complexity`] are pure heuristics.
//! - [`intent`] and [`planner`] call into the router and tolerate
//!   malformed model output with deterministic fallbacks.
//! - [`executor`] walks the plan against the [`tools`] registry with
//!   model fallback; [`verifier`] sanity-checks step output.
//! - [`store`] is the seam for whatever persistence the embedding
//!   application provides.

pub mod complexity;
pub mod executor;
pub mod fenced;
pub mod intent;
pub mod language;
pub mod planner;
pub mod store;
pub mod tools;
pub mod verifier;

pub use complexity::{ComplexityFactors, ComplexityScore, ContentLength, quick_score, score_complexity};
pub use executor::TaskExecutor;
pub use intent::{classify_intent, keyword_classify, required_tools};
pub use language::{LanguageResult, detect_language};
pub use planner::create_plan;
pub use store::{InMemoryStore, MemoryStore, StoreError};
pub use tools::{CalculatorTool, Tool, ToolError, ToolRegistry, ToolResult};
pub use verifier::{VerificationResult, verify_step_result};
