//! The tiered router: cheapest capable model first, escalate on failure.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};

use tierline_types::ModelResponse;

use crate::provider::{GenerateRequest, Provider};
use crate::tiers::{MAX_TIER, score_to_tier, tier_name};

/// Options for a routed generation call.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Complexity score 1-10 selecting the starting tier.
    pub complexity_score: i64,
    /// Optional system prompt.
    pub system: Option<String>,
    pub max_tokens: u32,
    pub temperature: f64,
    /// How many times the router may move up a tier after a failed
    /// provider call. Total provider calls are capped at this plus one.
    pub max_escalations: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            complexity_score: 5,
            system: None,
            max_tokens: 2048,
            temperature: 0.7,
            max_escalations: 2,
        }
    }
}

/// Routes requests to the cheapest capable tier and escalates upward
/// when a provider fails.
///
/// Escalation is unidirectional and capped at tier 4. Tiers with no
/// registered provider are stepped over without consuming an attempt.
/// Accumulated cost is stored as micro-dollars in an atomic so one
/// router can be shared across concurrent requests.
pub struct ModelRouter {
    providers: BTreeMap<u8, Arc<dyn Provider>>,
    total_cost_micros: AtomicU64,
}

impl ModelRouter {
    pub fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
            total_cost_micros: AtomicU64::new(0),
        }
    }

    /// Register a provider for a tier, replacing any existing one.
    /// Tiers outside 1..=4 are rejected.
    pub fn register(&mut self, tier: u8, provider: Arc<dyn Provider>) {
        if (1..=MAX_TIER).contains(&tier) {
            self.providers.insert(tier, provider);
        } else {
            warn!(tier, "ignoring provider registration for invalid tier");
        }
    }

    /// The provider registered for a tier, if any.
    pub fn provider(&self, tier: u8) -> Option<&Arc<dyn Provider>> {
        self.providers.get(&tier)
    }

    /// Generate text, starting at the tier recommended for the
    /// complexity score and escalating on failure.
    ///
    /// Never returns an error: when every usable tier has failed (or
    /// none is registered) the result is a failed [`ModelResponse`]
    /// with provider "router".
    pub async fn generate(&self, prompt: &str, options: &GenerateOptions) -> ModelResponse {
        let start_tier = score_to_tier(options.complexity_score);
        let mut current_tier = start_tier;
        let mut attempts: u32 = 0;
        let mut last_error = String::from("no model tiers configured");

        let mut request = GenerateRequest::new(prompt);
        request.system = options.system.clone();
        request.max_tokens = options.max_tokens;
        request.temperature = options.temperature;

        while attempts < options.max_escalations + 1 {
            let Some(provider) = self.providers.get(&current_tier) else {
                // Empty tier: step over it without spending an attempt.
                if current_tier >= MAX_TIER {
                    break;
                }
                current_tier += 1;
                continue;
            };

            info!(
                tier = current_tier,
                tier_name = tier_name(current_tier),
                provider = provider.name(),
                complexity = options.complexity_score,
                "attempting tier"
            );
            attempts += 1;

            let response = provider.generate(&request).await;
            if response.success {
                self.record_cost(response.cost_usd);
                info!(
                    tier = current_tier,
                    cost_usd = response.cost_usd,
                    input_tokens = response.input_tokens,
                    output_tokens = response.output_tokens,
                    "tier succeeded"
                );
                return response;
            }

            last_error = response
                .error
                .unwrap_or_else(|| "unknown error".to_string());
            warn!(
                tier = current_tier,
                provider = provider.name(),
                error = %last_error,
                "tier failed, escalating"
            );

            if current_tier >= MAX_TIER {
                break;
            }
            current_tier += 1;
        }

        ModelResponse::failure(
            "router",
            "none",
            format!("all model tiers failed: {last_error}"),
        )
    }

    /// Classify text against the given categories, walking up from the
    /// tier the complexity score recommends until a provider succeeds.
    pub async fn classify(
        &self,
        text: &str,
        categories: &[String],
        complexity_score: i64,
        system: &str,
    ) -> ModelResponse {
        let start_tier = score_to_tier(complexity_score);
        for tier in start_tier..=MAX_TIER {
            let Some(provider) = self.providers.get(&tier) else {
                continue;
            };
            let response = provider.classify(text, categories, system).await;
            if response.success {
                self.record_cost(response.cost_usd);
                return response;
            }
            warn!(
                tier,
                provider = provider.name(),
                "classification failed, trying next tier"
            );
        }
        ModelResponse::failure("router", "none", "no model available for classification")
    }

    /// Total accumulated cost in USD across all successful calls.
    pub fn total_cost(&self) -> f64 {
        self.total_cost_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }

    /// Zero the cost counter.
    pub fn reset_cost(&self) {
        self.total_cost_micros.store(0, Ordering::Relaxed);
    }

    fn record_cost(&self, cost_usd: f64) {
        if cost_usd > 0.0 {
            let micros = (cost_usd * 1_000_000.0).round() as u64;
            self.total_cost_micros.fetch_add(micros, Ordering::Relaxed);
        }
    }
}

impl Default for ModelRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tiers: Vec<(u8, &str)> = self
            .providers
            .iter()
            .map(|(tier, p)| (*tier, p.name()))
            .collect();
        f.debug_struct("ModelRouter")
            .field("tiers", &tiers)
            .field("total_cost_usd", &self.total_cost())
            .finish()
    }
}
