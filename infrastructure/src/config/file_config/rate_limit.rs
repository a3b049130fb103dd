//! Rate limit configuration from TOML (`[rate_limit]` section)
//!
//! ```toml
//! [rate_limit]
//! max_requests = 60
//! window_seconds = 60
//!
//! [rate_limit.tools]
//! "core.teams.POST" = 5
//! ```

use conductor_application::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Raw rate limit configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRateLimitConfig {
    pub enabled: bool,
    /// Calls allowed per window and caller
    pub max_requests: u32,
    pub window_seconds: u64,
    /// Per-tool overrides of `max_requests`
    pub tools: HashMap<String, u32>,
}

impl Default for FileRateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 60,
            window_seconds: 60,
            tools: HashMap::new(),
        }
    }
}

impl FileRateLimitConfig {
    pub fn to_rate_limit_config(&self) -> RateLimitConfig {
        self.tools.iter().fold(
            RateLimitConfig::default()
                .with_max_requests(self.max_requests)
                .with_window(Duration::from_secs(self.window_seconds)),
            |config, (tool, max)| config.with_tool_limit(tool.clone(), *max),
        )
    }
}
