//! Telemetry configuration from TOML (`[telemetry]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw telemetry configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTelemetryConfig {
    /// Emit execution records as tracing events
    pub tracing: bool,
    /// Append execution records to this JSONL file
    pub jsonl_path: Option<PathBuf>,
    /// Report resident memory deltas per call
    pub memory: bool,
}

impl Default for FileTelemetryConfig {
    fn default() -> Self {
        Self {
            tracing: true,
            jsonl_path: None,
            memory: true,
        }
    }
}
