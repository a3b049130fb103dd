//! Application layer for conductor
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutorConfig, OrchestratorConfig, RateLimitConfig};
pub use ports::{
    stores::{
        CacheStore, IdempotencyClaim, IdempotencyStore, RateLimitCounter, RateLimitStore,
        StoreError,
    },
    telemetry::{
        CompositeTelemetrySink, ExecutionOutcome, ExecutionRecord, MemoryProbe, NoMemoryProbe,
        NoTelemetry, TelemetrySink,
    },
    tool_executor::ToolExecutorPort,
};
pub use use_cases::execute_tool::ExecuteToolUseCase;
pub use use_cases::orchestrate::{OrchestrationPhase, ToolOrchestrator};
pub use use_cases::plan_chain::ChainPlanner;
pub use use_cases::resolve_dependency::DependencyResolver;
pub use use_cases::shared::{call_fingerprint, canonicalize};
