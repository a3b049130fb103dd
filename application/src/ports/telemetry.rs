//! Port for execution telemetry.
//!
//! Defines the [`TelemetrySink`] trait receiving one [`ExecutionRecord`] per
//! executor call, whatever the outcome.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures a machine-readable
//! record of every execution (duration, memory delta, cache and
//! idempotency flags).

use chrono::{SecondsFormat, Utc};
use conductor_domain::tool::entities::{Arguments, ToolContext};
use conductor_domain::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How an executor call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Tool body ran and succeeded
    Success,
    /// Tool body ran and failed (error result, uncaught failure, timeout)
    Failure,
    CacheHit,
    /// Replayed from the idempotency store
    Duplicate,
    /// Short-circuited before the tool body ran
    Rejected,
}

impl ExecutionOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionOutcome::Success => "success",
            ExecutionOutcome::Failure => "failure",
            ExecutionOutcome::CacheHit => "cache_hit",
            ExecutionOutcome::Duplicate => "duplicate",
            ExecutionOutcome::Rejected => "rejected",
        }
    }

    /// Whether the caller got a failed result
    pub fn is_failure(&self) -> bool {
        matches!(self, ExecutionOutcome::Failure | ExecutionOutcome::Rejected)
    }
}

impl std::fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One executor call, as reported to telemetry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub tool: String,
    pub arguments: Arguments,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    pub outcome: ExecutionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    pub duration_ms: u64,
    /// Resident memory change across the call, in bytes
    pub memory_delta_bytes: i64,
    pub trace_id: String,
    pub retry_count: u32,
    pub cache_hit: bool,
    pub duplicate: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    /// RFC 3339, UTC, millisecond precision
    pub timestamp: String,
}

impl ExecutionRecord {
    /// Build a record from a finished call.
    ///
    /// Flags, retry count and idempotency key are read from the result's
    /// metadata.
    pub fn from_result(
        arguments: &Arguments,
        context: &ToolContext,
        result: &ToolResult,
        outcome: ExecutionOutcome,
    ) -> Self {
        let metadata = &result.metadata;
        Self {
            tool: result.tool_name.clone(),
            arguments: arguments.clone(),
            principal_id: context.principal_id.clone(),
            team_id: context.team_id.clone(),
            outcome,
            error_code: result.error_code().map(str::to_string),
            duration_ms: metadata.duration_ms.unwrap_or(0),
            memory_delta_bytes: 0,
            trace_id: metadata.trace_id.clone().unwrap_or_default(),
            retry_count: metadata.retry_count,
            cache_hit: metadata.cache_hit,
            duplicate: metadata.duplicate,
            idempotency_key: metadata.idempotency_key.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn with_memory_delta(mut self, bytes: i64) -> Self {
        self.memory_delta_bytes = bytes;
        self
    }
}

/// Port for recording execution telemetry.
///
/// `record` is synchronous and non-fallible so a broken sink never
/// disturbs the execution it observes; sinks swallow their own errors.
pub trait TelemetrySink: Send + Sync {
    fn record(&self, record: &ExecutionRecord);
}

/// No-op implementation for tests and when telemetry is disabled.
pub struct NoTelemetry;

impl TelemetrySink for NoTelemetry {
    fn record(&self, _record: &ExecutionRecord) {}
}

/// A sink that forwards every record to multiple inner sinks.
#[derive(Default)]
pub struct CompositeTelemetrySink {
    delegates: Vec<Arc<dyn TelemetrySink>>,
}

impl CompositeTelemetrySink {
    pub fn new(delegates: Vec<Arc<dyn TelemetrySink>>) -> Self {
        Self { delegates }
    }

    pub fn with_sink(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.delegates.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.delegates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.delegates.is_empty()
    }
}

impl TelemetrySink for CompositeTelemetrySink {
    fn record(&self, record: &ExecutionRecord) {
        for sink in &self.delegates {
            sink.record(record);
        }
    }
}

/// Source of the process's current memory usage.
pub trait MemoryProbe: Send + Sync {
    /// Resident bytes, or `None` when unavailable on this platform
    fn current_bytes(&self) -> Option<u64>;
}

/// Probe that never reports; memory deltas are then always zero.
pub struct NoMemoryProbe;

impl MemoryProbe for NoMemoryProbe {
    fn current_bytes(&self) -> Option<u64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct CollectingSink {
        tools: Mutex<Vec<String>>,
    }

    impl TelemetrySink for CollectingSink {
        fn record(&self, record: &ExecutionRecord) {
            self.tools.lock().unwrap().push(record.tool.clone());
        }
    }

    #[test]
    fn test_record_from_result() {
        let mut result = ToolResult::success("echo", json!({"echo": "hi"}));
        result.metadata.duration_ms = Some(12);
        result.metadata.trace_id = Some("trace-1".to_string());
        result.metadata.cache_hit = true;
        let context = ToolContext::new().with_principal("u1");

        let record =
            ExecutionRecord::from_result(&Arguments::new(), &context, &result, ExecutionOutcome::CacheHit)
                .with_memory_delta(-4096);

        assert_eq!(record.tool, "echo");
        assert_eq!(record.duration_ms, 12);
        assert_eq!(record.trace_id, "trace-1");
        assert!(record.cache_hit);
        assert_eq!(record.principal_id.as_deref(), Some("u1"));
        assert_eq!(record.memory_delta_bytes, -4096);
        assert!(record.timestamp.ends_with('Z'));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["outcome"], "cache_hit");
        assert!(value.get("error_code").is_none());
    }

    #[test]
    fn test_composite_fans_out() {
        let first = Arc::new(CollectingSink { tools: Mutex::new(Vec::new()) });
        let second = Arc::new(CollectingSink { tools: Mutex::new(Vec::new()) });
        let composite = CompositeTelemetrySink::default()
            .with_sink(first.clone())
            .with_sink(second.clone())
            .with_sink(Arc::new(NoTelemetry));
        assert_eq!(composite.len(), 3);

        let result = ToolResult::success("echo", json!({}));
        let record = ExecutionRecord::from_result(
            &Arguments::new(),
            &ToolContext::new(),
            &result,
            ExecutionOutcome::Success,
        );
        composite.record(&record);

        assert_eq!(*first.tools.lock().unwrap(), vec!["echo"]);
        assert_eq!(*second.tools.lock().unwrap(), vec!["echo"]);
    }

    #[test]
    fn test_outcome_failure_flags() {
        assert!(ExecutionOutcome::Rejected.is_failure());
        assert!(ExecutionOutcome::Failure.is_failure());
        assert!(!ExecutionOutcome::Duplicate.is_failure());
    }
}
