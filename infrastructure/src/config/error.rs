//! Configuration errors

use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("executor.default_timeout_ms cannot be 0")]
    InvalidTimeout,

    #[error("executor.tool_timeouts_ms.{0} cannot be 0")]
    InvalidToolTimeout(String),

    #[error("{0}.ttl_seconds cannot be 0")]
    InvalidTtl(&'static str),

    #[error("rate_limit.window_seconds cannot be 0")]
    InvalidWindow,
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigValidationError),
}
