//! JSONL file writer for execution records.
//!
//! Each [`ExecutionRecord`] is serialized as a single JSON line with a
//! `type` field, appended to the file via a buffered writer.

use conductor_application::ports::telemetry::{ExecutionRecord, TelemetrySink};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL telemetry sink that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file.
/// Flushes on `Drop`.
pub struct JsonlTelemetrySink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTelemetrySink {
    /// Create a sink appending to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create telemetry directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open telemetry file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the telemetry file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TelemetrySink for JsonlTelemetrySink {
    fn record(&self, record: &ExecutionRecord) {
        let mut value = match serde_json::to_value(record) {
            Ok(value) => value,
            Err(_) => return,
        };
        if let Some(map) = value.as_object_mut() {
            let event_type = if record.outcome.is_failure() {
                "tool_failed"
            } else {
                "tool_executed"
            };
            map.insert("type".to_string(), serde_json::Value::from(event_type));
        }

        let Ok(line) = serde_json::to_string(&value) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // JSONL is append-only; flush each record for crash safety
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTelemetrySink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
