//! In-memory store adapters for the executor pipeline.
//!
//! Each store keeps its state behind a single `tokio::sync::Mutex`, which
//! makes increment and check-and-set atomic within one process. Suitable
//! for a single-instance deployment; a shared backend would implement the
//! same ports.

mod cache;
mod idempotency;
mod rate_limit;

pub use cache::InMemoryCacheStore;
pub use idempotency::InMemoryIdempotencyStore;
pub use rate_limit::FixedWindowRateLimiter;
