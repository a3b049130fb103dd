//! Store configuration from TOML (`[cache]` and `[idempotency]` sections)

use serde::{Deserialize, Serialize};

/// Raw cache configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCacheConfig {
    pub enabled: bool,
    /// Lifetime of a cached read-only result
    pub ttl_seconds: u64,
    /// Upper bound on cached entries
    pub max_entries: usize,
}

impl Default for FileCacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 300,
            max_entries: 1024,
        }
    }
}

/// Raw idempotency configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileIdempotencyConfig {
    pub enabled: bool,
    /// How long a completed result answers duplicates
    pub ttl_seconds: u64,
}

impl Default for FileIdempotencyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 24 * 60 * 60,
        }
    }
}
