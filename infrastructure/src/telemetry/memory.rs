//! Process memory probe.

use conductor_application::ports::telemetry::MemoryProbe;
use std::path::PathBuf;

/// Reads the resident set size of the current process.
///
/// Prefers the `Rss:` line of `/proc/self/smaps_rollup` and falls back to
/// `VmRSS:` in `/proc/self/status` on kernels without the rollup. Both are
/// reported in kB, so the result does not depend on the page size. On
/// platforms without procfs every read returns `None`, which the executor
/// reports as a zero delta.
#[derive(Debug, Clone)]
pub struct ProcessMemoryProbe {
    sources: Vec<(PathBuf, &'static str)>,
}

impl Default for ProcessMemoryProbe {
    fn default() -> Self {
        Self {
            sources: vec![
                (PathBuf::from("/proc/self/smaps_rollup"), "Rss:"),
                (PathBuf::from("/proc/self/status"), "VmRSS:"),
            ],
        }
    }
}

impl ProcessMemoryProbe {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryProbe for ProcessMemoryProbe {
    fn current_bytes(&self) -> Option<u64> {
        self.sources.iter().find_map(|(path, field)| {
            let content = std::fs::read_to_string(path).ok()?;
            parse_kb_field(&content, field)
        })
    }
}

/// Value of a `Field:   1234 kB` line, in bytes.
fn parse_kb_field(content: &str, field: &str) -> Option<u64> {
    let line = content.lines().find(|line| line.starts_with(field))?;
    let mut parts = line[field.len()..].split_whitespace();
    let kb: u64 = parts.next()?.parse().ok()?;
    match parts.next() {
        Some(unit) if unit.eq_ignore_ascii_case("kb") => Some(kb * 1024),
        _ => None,
    }
}
