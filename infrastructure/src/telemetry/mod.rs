//! Telemetry infrastructure: execution record sinks and memory probing.
//!
//! Provides the adapters behind the
//! [`TelemetrySink`](conductor_application::TelemetrySink) and
//! [`MemoryProbe`](conductor_application::MemoryProbe) ports:
//!
//! - [`TracingTelemetrySink`]: structured `tracing` events
//! - [`JsonlTelemetrySink`]: one JSON object per line, appended to a file
//! - [`ProcessMemoryProbe`]: resident set size from procfs

mod jsonl_sink;
mod memory;
mod tracing_sink;

pub use jsonl_sink::JsonlTelemetrySink;
pub use memory::ProcessMemoryProbe;
pub use tracing_sink::TracingTelemetrySink;
