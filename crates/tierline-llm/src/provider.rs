//! The [`Provider`] trait for tiered model backends.

use async_trait::async_trait;

use tierline_types::ModelResponse;

/// A text generation request.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The user prompt.
    pub prompt: String,
    /// Optional system prompt.
    pub system: Option<String>,
    /// Generation cap in tokens.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f64,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            max_tokens: 2048,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// A model backend occupying one tier of the router.
///
/// Implementations handle protocol details for a specific backend.
/// Failures are reported in-band: `generate` and `classify` always
/// return a [`ModelResponse`], with `success` cleared on failure, so
/// the router can escalate without unwinding.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name (e.g. "local", "groq", "anthropic").
    fn name(&self) -> &str;

    /// Model this provider serves.
    fn model(&self) -> &str;

    /// Generate text for the request.
    async fn generate(&self, request: &GenerateRequest) -> ModelResponse;

    /// Pick one of `categories` for `text`. The response `text` holds
    /// the chosen category name.
    async fn classify(&self, text: &str, categories: &[String], system: &str) -> ModelResponse;

    /// Cheap liveness probe. The default issues a one-token generation.
    async fn health_check(&self) -> bool {
        let mut request = GenerateRequest::new("ping");
        request.max_tokens = 1;
        self.generate(&request).await.success
    }
}
