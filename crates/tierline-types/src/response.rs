//! The uniform response shape returned by every capability provider.

use serde::{Deserialize, Serialize};

/// Response from a model provider call (generation or classification).
///
/// Providers never return `Result`: failures are reported in-band via
/// the `success` flag so the router can escalate without unwinding.
/// When `success` is `false`, `text` is irrelevant and `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelResponse {
    /// The generated text, or the chosen category for classification.
    pub text: String,
    /// Model identifier that produced the response.
    pub model: String,
    /// Provider identifier (e.g. "local", "fast-cloud").
    pub provider: String,
    /// Tokens consumed by the prompt.
    pub input_tokens: u32,
    /// Tokens generated in the response.
    pub output_tokens: u32,
    /// Cost of this call in USD. Never negative.
    pub cost_usd: f64,
    /// Whether the call succeeded.
    pub success: bool,
    /// Error description when `success` is `false`.
    pub error: Option<String>,
}

impl Default for ModelResponse {
    fn default() -> Self {
        Self {
            text: String::new(),
            model: String::new(),
            provider: String::new(),
            input_tokens: 0,
            output_tokens: 0,
            cost_usd: 0.0,
            success: true,
            error: None,
        }
    }
}

impl ModelResponse {
    /// Build a successful response with the given text.
    pub fn success(
        text: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            provider: provider.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Build a failed response. `text` is left empty and `error` is set.
    pub fn failure(
        provider: impl Into<String>,
        model: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            success: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Attach token counts and cost to the response.
    pub fn with_usage(mut self, input_tokens: u32, output_tokens: u32, cost_usd: f64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self.cost_usd = cost_usd;
        self
    }
}
