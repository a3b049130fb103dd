//! Orchestrator configuration from TOML (`[orchestrator]` section)

use serde::{Deserialize, Serialize};

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Depth budget for orchestrated calls
    pub max_depth: u32,
    /// Log a chain plan before resolving dependencies
    pub plan_first: bool,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            plan_first: false,
        }
    }
}
