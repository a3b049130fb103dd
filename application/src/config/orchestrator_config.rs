//! Orchestrator parameters.

use serde::{Deserialize, Serialize};

/// Defaults used by [`ToolOrchestrator::execute`](crate::use_cases::orchestrate::ToolOrchestrator::execute).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Depth budget handed to each orchestrated call
    pub default_max_depth: u32,
    /// Build a chain plan before resolving dependencies
    pub plan_first: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            default_max_depth: 5,
            plan_first: false,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.default_max_depth = depth;
        self
    }

    pub fn with_plan_first(mut self, plan_first: bool) -> Self {
        self.plan_first = plan_first;
        self
    }
}
