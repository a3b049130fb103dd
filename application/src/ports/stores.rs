//! Store ports used by the executor pipeline.
//!
//! The executor treats these as opaque key-value services. Atomicity is the
//! store's job: [`RateLimitStore::increment`] must be an atomic
//! increment-and-read, and [`IdempotencyStore::claim`] must be a
//! check-and-set so two identical concurrent requests cannot both run.

use async_trait::async_trait;
use conductor_domain::tool::value_objects::ToolResult;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by store adapters
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Stored value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result cache for read-only tools.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ToolResult>, StoreError>;

    async fn put(&self, key: &str, value: ToolResult, ttl: Duration) -> Result<(), StoreError>;
}

/// Counter state after an increment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitCounter {
    /// Calls counted in the current window, this one included
    pub count: u32,
    /// Time until the current window resets
    pub reset_after: Duration,
}

/// Windowed counters for rate limiting.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Count one call against `key` within a window of length `window`.
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitCounter, StoreError>;
}

/// Outcome of [`IdempotencyStore::claim`]
#[derive(Debug, Clone, PartialEq)]
pub enum IdempotencyClaim {
    /// The caller owns the key and must `complete` or `release` it
    Claimed,
    /// Another caller holds the key and has not finished
    InFlight,
    /// A previous execution finished with this result
    Completed(ToolResult),
}

/// Check-and-set store backing at-most-once execution of idempotent tools.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    async fn claim(&self, key: &str, ttl: Duration) -> Result<IdempotencyClaim, StoreError>;

    /// Store the result of a successful execution for `ttl`.
    async fn complete(&self, key: &str, result: &ToolResult, ttl: Duration) -> Result<(), StoreError>;

    /// Drop an unfinished claim so a later request can run.
    async fn release(&self, key: &str) -> Result<(), StoreError>;
}
