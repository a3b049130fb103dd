//! Telemetry sink emitting `tracing` events.

use conductor_application::ports::telemetry::{ExecutionRecord, TelemetrySink};
use tracing::{info, warn};

/// Reports every execution as a structured event on the
/// `conductor::telemetry` target: `info` for answered calls, `warn` for
/// failures and rejections.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTelemetrySink;

impl TelemetrySink for TracingTelemetrySink {
    fn record(&self, record: &ExecutionRecord) {
        if record.outcome.is_failure() {
            warn!(
                target: "conductor::telemetry",
                tool = %record.tool,
                outcome = %record.outcome,
                code = record.error_code.as_deref().unwrap_or_default(),
                duration_ms = record.duration_ms,
                memory_delta_bytes = record.memory_delta_bytes,
                trace_id = %record.trace_id,
                retry_count = record.retry_count,
                "tool failed"
            );
        } else {
            info!(
                target: "conductor::telemetry",
                tool = %record.tool,
                outcome = %record.outcome,
                duration_ms = record.duration_ms,
                memory_delta_bytes = record.memory_delta_bytes,
                trace_id = %record.trace_id,
                retry_count = record.retry_count,
                cache_hit = record.cache_hit,
                duplicate = record.duplicate,
                "tool executed"
            );
        }
    }
}
