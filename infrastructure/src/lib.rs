//! Infrastructure layer for conductor
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: in-memory stores, telemetry sinks,
//! configuration file loading and builtin tools.

pub mod config;
pub mod stores;
pub mod telemetry;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, ConfigValidationError, FileConfig};
pub use stores::{FixedWindowRateLimiter, InMemoryCacheStore, InMemoryIdempotencyStore};
pub use telemetry::{JsonlTelemetrySink, ProcessMemoryProbe, TracingTelemetrySink};
pub use tools::{EchoTool, FunctionTool};
