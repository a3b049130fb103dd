//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into the application
//! configuration types once validated.

mod executor;
mod orchestrator;
mod rate_limit;
mod stores;
mod telemetry;

pub use executor::FileExecutorConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use rate_limit::FileRateLimitConfig;
pub use stores::{FileCacheConfig, FileIdempotencyConfig};
pub use telemetry::FileTelemetryConfig;

use super::error::ConfigValidationError;
use conductor_application::{ExecutorConfig, OrchestratorConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Timeouts and retries
    pub executor: FileExecutorConfig,
    /// Fixed-window rate limiting
    pub rate_limit: FileRateLimitConfig,
    /// Result cache for read-only tools
    pub cache: FileCacheConfig,
    /// At-most-once execution of idempotent tools
    pub idempotency: FileIdempotencyConfig,
    /// Dependency orchestration defaults
    pub orchestrator: FileOrchestratorConfig,
    /// Execution record sinks
    pub telemetry: FileTelemetryConfig,
}

impl FileConfig {
    /// Validate the configuration, stopping at the first problem.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.executor.default_timeout_ms == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if let Some((tool, _)) = self
            .executor
            .tool_timeouts_ms
            .iter()
            .find(|(_, timeout)| **timeout == 0)
        {
            return Err(ConfigValidationError::InvalidToolTimeout(tool.clone()));
        }
        if self.cache.ttl_seconds == 0 {
            return Err(ConfigValidationError::InvalidTtl("cache"));
        }
        if self.idempotency.ttl_seconds == 0 {
            return Err(ConfigValidationError::InvalidTtl("idempotency"));
        }
        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigValidationError::InvalidWindow);
        }
        Ok(())
    }

    /// Build the executor pipeline parameters.
    pub fn to_executor_config(&self) -> ExecutorConfig {
        let mut config = ExecutorConfig::default()
            .with_default_timeout(Duration::from_millis(self.executor.default_timeout_ms))
            .with_max_retries(self.executor.max_retries)
            .with_cache_ttl(Duration::from_secs(self.cache.ttl_seconds))
            .with_idempotency_ttl(Duration::from_secs(self.idempotency.ttl_seconds))
            .with_rate_limit(self.rate_limit.to_rate_limit_config());

        for (tool, timeout_ms) in &self.executor.tool_timeouts_ms {
            config = config.with_tool_timeout(tool.clone(), Duration::from_millis(*timeout_ms));
        }
        config
    }

    pub fn to_orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig::default()
            .with_max_depth(self.orchestrator.max_depth)
            .with_plan_first(self.orchestrator.plan_first)
    }
}
