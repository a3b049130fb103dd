//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`ExecutorConfig`]: timeouts, retries, TTLs and rate limits of the executor pipeline
//! - [`OrchestratorConfig`]: default depth budget and planning behavior

pub mod executor_config;
pub mod orchestrator_config;

pub use executor_config::{ExecutorConfig, RateLimitConfig};
pub use orchestrator_config::OrchestratorConfig;
