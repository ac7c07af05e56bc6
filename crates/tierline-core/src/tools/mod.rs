//! Tool contract and registry.
//!
//! Defines the interface every tool implements ([`Tool`]) and a
//! [`ToolRegistry`] that stores tools behind `Arc<dyn Tool>` and
//! dispatches execution requests by name.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

pub mod calculator;

pub use calculator::CalculatorTool;

/// Error type for tool execution.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The tool does not support the requested action.
    #[error("unknown action: {0}")]
    UnknownAction(String),

    /// The arguments provided to the action are invalid.
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    /// The action failed at runtime.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

/// Successful output of a tool action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolResult {
    /// Result text to surface to the user or a following step.
    pub data: String,
    /// Paths of files the action created or modified.
    pub files: Vec<String>,
}

impl ToolResult {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            files: Vec::new(),
        }
    }
}

/// An action the engine can take in the world.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool identifier (e.g. "calculator").
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Actions this tool supports.
    fn actions(&self) -> &[&str];

    /// Run an action with the given parameters.
    async fn execute(
        &self,
        action: &str,
        params: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<ToolResult, ToolError>;
}

/// Name-indexed collection of tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any previous tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        debug!(tool = tool.name(), "registering tool");
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// "name: description" lines for every tool, sorted by name.
    pub fn descriptions(&self) -> Vec<String> {
        self.list()
            .into_iter()
            .filter_map(|name| {
                self.tools
                    .get(&name)
                    .map(|t| format!("{name}: {}", t.description()))
            })
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.list())
            .finish()
    }
}
