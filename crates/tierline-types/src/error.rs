//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Errors surfaced by the engine's internal machinery.
///
/// Note that provider calls themselves never produce these: failures
/// there travel in-band inside `ModelResponse`. This taxonomy covers
/// everything around the provider seam.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No provider is configured for any usable tier.
    #[error("no provider available: {0}")]
    ProviderUnavailable(String),

    /// A provider returned something the engine could not use.
    #[error("provider error: {0}")]
    Provider(String),

    /// Structured output from a model failed to parse.
    #[error("parse error: {0}")]
    Parse(String),

    /// A tool invocation failed.
    #[error("tool error: {0}")]
    Tool(String),

    /// A step's declared dependency did not complete.
    #[error("dependency not met: {0}")]
    DependencyUnmet(String),
}

/// Errors loading or saving engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}
