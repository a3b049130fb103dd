//! Tool Executor port
//!
//! Defines the interface for running a tool by name. The dependency
//! resolver and the orchestrator depend on this port rather than on the
//! concrete executor pipeline.

use async_trait::async_trait;
use conductor_domain::tool::{
    entities::{Arguments, ToolContext},
    registry::ToolRegistry,
    value_objects::ToolResult,
};
use std::sync::Arc;

/// Port for tool execution
///
/// Implementations never fail across this boundary: every outcome,
/// including unknown tools and uncaught tool failures, is a [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The registry tools are looked up in
    fn registry(&self) -> &Arc<ToolRegistry>;

    /// Check if a tool is available (legacy names included)
    fn has_tool(&self, name: &str) -> bool {
        self.registry().has(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<String> {
        self.registry().names()
    }

    /// Execute a tool by name
    async fn execute(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> ToolResult;
}
