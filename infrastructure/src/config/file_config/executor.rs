//! Executor configuration from TOML (`[executor]` section)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Raw executor configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutorConfig {
    /// Budget for a single tool call in milliseconds
    pub default_timeout_ms: u64,
    /// Per-tool timeout overrides (tool name -> milliseconds)
    pub tool_timeouts_ms: HashMap<String, u64>,
    /// Extra attempts for read-only tools that time out
    pub max_retries: u32,
}

impl Default for FileExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: 30_000,
            tool_timeouts_ms: HashMap::new(),
            max_retries: 0,
        }
    }
}
