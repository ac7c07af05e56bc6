//! Engine configuration: the tier table and spending limit.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Provider binding for one model tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierConfig {
    /// Provider identifier (e.g. "local", "groq", "anthropic").
    pub provider: String,
    /// Model name within the provider.
    pub model: String,
    /// Optional fallback provider if the primary is unreachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl TierConfig {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            fallback: None,
        }
    }
}

/// Top-level engine configuration.
///
/// Tiers run cheapest to most capable. Any tier may be absent, in
/// which case the router skips over it during escalation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name of the assistant.
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    /// Default response language code.
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub tier1: Option<TierConfig>,
    #[serde(default)]
    pub tier2: Option<TierConfig>,
    #[serde(default)]
    pub tier3: Option<TierConfig>,
    #[serde(default)]
    pub tier4: Option<TierConfig>,
    /// Soft monthly spending ceiling in USD.
    #[serde(default = "default_cost_limit")]
    pub monthly_cost_limit_usd: f64,
}

fn default_name() -> String {
    "tierline".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_cost_limit() -> f64 {
    50.0
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            version: default_version(),
            language: default_language(),
            tier1: Some(TierConfig::new("local", "gemma:2b")),
            tier2: Some(TierConfig::new("groq", "llama-3.1-8b-instant")),
            tier3: Some(TierConfig::new("anthropic", "claude-sonnet-4-5")),
            tier4: Some(TierConfig::new("anthropic", "claude-opus-4-1")),
            monthly_cost_limit_usd: default_cost_limit(),
        }
    }
}

impl EngineConfig {
    /// Tier config by number, 1-4. Out-of-range numbers return `None`.
    pub fn tier(&self, n: u8) -> Option<&TierConfig> {
        match n {
            1 => self.tier1.as_ref(),
            2 => self.tier2.as_ref(),
            3 => self.tier3.as_ref(),
            4 => self.tier4.as_ref(),
            _ => None,
        }
    }

    /// Load from a JSON file, then apply environment overrides.
    /// `TIERLINE_COST_LIMIT` overrides the monthly ceiling when set to
    /// a valid number.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: EngineConfig = serde_json::from_str(&text)?;
        config.apply_env();
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(raw) = std::env::var("TIERLINE_COST_LIMIT") {
            if let Ok(limit) = raw.trim().parse::<f64>() {
                self.monthly_cost_limit_usd = limit;
            }
        }
    }
}
