//! Executor parameters: pipeline control.
//!
//! [`ExecutorConfig`] groups the static parameters of
//! [`ExecuteToolUseCase`](crate::use_cases::execute_tool::ExecuteToolUseCase).
//! Which stores are attached is decided at construction; these values only
//! shape how an attached store is used.
//!
//! Per-tool overrides may be keyed by a tool's canonical name or by any
//! legacy alias the registry resolves to it.

use conductor_domain::tool::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Fixed-window rate limiting parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Calls allowed per window when no per-tool limit is set
    pub max_requests: u32,
    pub window: Duration,
    /// Per-tool overrides of `max_requests`
    pub tool_limits: HashMap<String, u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window: Duration::from_secs(60),
            tool_limits: HashMap::new(),
        }
    }
}

impl RateLimitConfig {
    pub fn with_max_requests(mut self, max: u32) -> Self {
        self.max_requests = max;
        self
    }

    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn with_tool_limit(mut self, tool: impl Into<String>, max: u32) -> Self {
        self.tool_limits.insert(tool.into(), max);
        self
    }

    /// Limit for the registered tool `tool` (a canonical name)
    pub fn limit_for(&self, tool: &str, registry: &ToolRegistry) -> u32 {
        tool_override(&self.tool_limits, tool, registry).unwrap_or(self.max_requests)
    }
}

/// Executor pipeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Budget for a single `execute` call
    pub default_timeout: Duration,
    /// Per-tool overrides of `default_timeout`
    pub tool_timeouts: HashMap<String, Duration>,
    /// Extra attempts for read-only tools failing with a timeout
    pub max_retries: u32,
    pub cache_ttl: Duration,
    pub idempotency_ttl: Duration,
    pub rate_limit: RateLimitConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_millis(30_000),
            tool_timeouts: HashMap::new(),
            max_retries: 0,
            cache_ttl: Duration::from_secs(300),
            idempotency_ttl: Duration::from_secs(24 * 60 * 60),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl ExecutorConfig {
    // ==================== Builder Methods ====================

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, tool: impl Into<String>, timeout: Duration) -> Self {
        self.tool_timeouts.insert(tool.into(), timeout);
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_idempotency_ttl(mut self, ttl: Duration) -> Self {
        self.idempotency_ttl = ttl;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Timeout for the registered tool `tool` (a canonical name)
    pub fn timeout_for(&self, tool: &str, registry: &ToolRegistry) -> Duration {
        tool_override(&self.tool_timeouts, tool, registry).unwrap_or(self.default_timeout)
    }

    /// Override keys that name no registered tool, sorted.
    pub fn unknown_tool_keys(&self, registry: &ToolRegistry) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .tool_timeouts
            .keys()
            .chain(self.rate_limit.tool_limits.keys())
            .map(String::as_str)
            .filter(|key| !registry.has(key))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        unknown
    }
}

/// An exact key wins; otherwise the first key (by name) resolving to `tool`.
fn tool_override<V: Copy>(
    overrides: &HashMap<String, V>,
    tool: &str,
    registry: &ToolRegistry,
) -> Option<V> {
    if let Some(value) = overrides.get(tool) {
        return Some(*value);
    }
    overrides
        .iter()
        .filter(|(key, _)| registry.resolve_name(key).as_deref() == Some(tool))
        .min_by(|a, b| a.0.cmp(b.0))
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{ScriptedTool, registry_with};
    use std::sync::Arc;

    #[test]
    fn test_default() {
        let config = ExecutorConfig::default();
        assert_eq!(config.default_timeout, Duration::from_secs(30));
        assert_eq!(config.max_retries, 0);
        assert_eq!(config.rate_limit.max_requests, 60);
    }

    #[test]
    fn test_per_tool_overrides() {
        let registry = ToolRegistry::new();
        let config = ExecutorConfig::default()
            .with_tool_timeout("slow.report.GET", Duration::from_secs(120))
            .with_rate_limit(RateLimitConfig::default().with_tool_limit("core.teams.POST", 5));

        assert_eq!(config.timeout_for("slow.report.GET", &registry), Duration::from_secs(120));
        assert_eq!(config.timeout_for("echo", &registry), Duration::from_secs(30));
        assert_eq!(config.rate_limit.limit_for("core.teams.POST", &registry), 5);
        assert_eq!(config.rate_limit.limit_for("echo", &registry), 60);
    }

    #[test]
    fn test_overrides_keyed_by_legacy_alias() {
        let registry = registry_with(vec![
            Arc::new(ScriptedTool::echoing("core.teams.GET")),
            Arc::new(ScriptedTool::echoing("core.teams.POST")),
        ]);
        let config = ExecutorConfig::default()
            .with_tool_timeout("core.teams.list", Duration::from_secs(5))
            .with_tool_timeout("reports.export.GET", Duration::from_secs(120))
            .with_rate_limit(
                RateLimitConfig::default()
                    .with_tool_limit("core.teams.create", 3)
                    .with_tool_limit("core.teams.POST", 4),
            );

        assert_eq!(config.timeout_for("core.teams.GET", &registry), Duration::from_secs(5));
        assert_eq!(config.rate_limit.limit_for("core.teams.POST", &registry), 4);
        assert_eq!(config.unknown_tool_keys(&registry), vec!["reports.export.GET"]);
    }
}
