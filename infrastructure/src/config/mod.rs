//! Configuration file loading for conductor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `CONDUCTOR_` environment variables (`__` separates nested keys)
//! 2. `--config <path>` specified file
//! 3. Project root: `./conductor.toml` or `./.conductor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/conductor/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod loader;

pub use error::{ConfigError, ConfigValidationError};
pub use file_config::{
    FileCacheConfig, FileConfig, FileExecutorConfig, FileIdempotencyConfig,
    FileOrchestratorConfig, FileRateLimitConfig, FileTelemetryConfig,
};
pub use loader::ConfigLoader;
