//! Tiered model routing for the tierline engine.
//!
//! This crate holds the provider seam and the router that drives it:
//!
//! - [`Provider`]: the async capability trait a model backend implements.
//! - [`tiers`]: the complexity-score to tier mapping.
//! - [`ModelRouter`]: picks a starting tier from a complexity score,
//!   escalates to more capable tiers on failure, and accumulates cost.
//!
//! Concrete wire protocols (HTTP clients, auth, streaming) live behind
//! the [`Provider`] trait and are supplied by the embedding application.

pub mod provider;
pub mod router;
pub mod tiers;

pub use provider::{GenerateRequest, Provider};
pub use router::{GenerateOptions, ModelRouter};
pub use tiers::{MAX_TIER, score_to_tier, tier_name};
