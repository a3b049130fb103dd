//! Mock tools and ports shared by the use case tests.

use crate::ports::stores::{
    CacheStore, IdempotencyClaim, IdempotencyStore, RateLimitCounter, RateLimitStore, StoreError,
};
use crate::ports::telemetry::{ExecutionOutcome, ExecutionRecord, MemoryProbe, TelemetrySink};
use async_trait::async_trait;
use conductor_domain::dependency::ToolDependency;
use conductor_domain::tool::{
    Arguments, DependencyProvider, MetadataProvider, Tool, ToolContext, ToolFailure, ToolMetadata,
    ToolRegistry, ToolResult, ToolSchema,
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Behavior = Box<dyn Fn(&Arguments) -> Result<ToolResult, ToolFailure> + Send + Sync>;

/// Tool whose body is a closure; counts its invocations.
pub struct ScriptedTool {
    name: String,
    schema: ToolSchema,
    metadata: Option<ToolMetadata>,
    dependencies: Vec<ToolDependency>,
    delay: Option<Duration>,
    first_call_delay: Option<Duration>,
    behavior: Behavior,
    calls: AtomicUsize,
    seen: Mutex<Vec<Arguments>>,
}

impl ScriptedTool {
    pub fn new<F>(name: &str, behavior: F) -> Self
    where
        F: Fn(&Arguments) -> Result<ToolResult, ToolFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            schema: ToolSchema::new(),
            metadata: None,
            dependencies: Vec::new(),
            delay: None,
            first_call_delay: None,
            behavior: Box::new(behavior),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Always succeeds with `data`
    pub fn returning(name: &str, data: Value) -> Self {
        let tool_name = name.to_string();
        Self::new(name, move |_| Ok(ToolResult::success(tool_name.clone(), data.clone())))
    }

    /// Echoes its arguments back as data
    pub fn echoing(name: &str) -> Self {
        let tool_name = name.to_string();
        Self::new(name, move |arguments| {
            Ok(ToolResult::success(tool_name.clone(), Value::Object(arguments.clone())))
        })
    }

    pub fn with_schema(mut self, schema: ToolSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_metadata(mut self, metadata: ToolMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_dependency(mut self, dependency: ToolDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Only the first invocation sleeps
    pub fn with_first_call_delay(mut self, delay: Duration) -> Self {
        self.first_call_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_arguments(&self) -> Vec<Arguments> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "scripted test tool"
    }

    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(
        &self,
        arguments: &Arguments,
        _context: &ToolContext,
    ) -> Result<ToolResult, ToolFailure> {
        let previous_calls = self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(arguments.clone());
        let delay = match self.first_call_delay {
            Some(delay) if previous_calls == 0 => Some(delay),
            _ => self.delay,
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        (self.behavior)(arguments)
    }

    fn metadata_provider(&self) -> Option<&dyn MetadataProvider> {
        self.metadata.as_ref().map(|_| self as &dyn MetadataProvider)
    }

    fn dependency_provider(&self) -> Option<&dyn DependencyProvider> {
        if self.dependencies.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl MetadataProvider for ScriptedTool {
    fn metadata(&self) -> ToolMetadata {
        self.metadata.clone().unwrap_or_else(ToolMetadata::utility)
    }
}

impl DependencyProvider for ScriptedTool {
    fn dependencies(&self) -> Vec<ToolDependency> {
        self.dependencies.clone()
    }
}

pub fn args(value: Value) -> Arguments {
    value.as_object().cloned().unwrap_or_default()
}

pub fn registry_with(tools: Vec<Arc<ScriptedTool>>) -> Arc<ToolRegistry> {
    let registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool);
    }
    Arc::new(registry)
}

pub fn echo_tool() -> Arc<ScriptedTool> {
    Arc::new(ScriptedTool::new("echo", |arguments| {
        let message = arguments.get("message").cloned().unwrap_or(Value::Null);
        Ok(ToolResult::success("echo", json!({ "echo": message })))
    }))
}

/// Map-backed cache; TTLs are ignored.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, ToolResult>>,
}

impl MemoryCache {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<ToolResult>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, key: &str, value: ToolResult, _ttl: Duration) -> Result<(), StoreError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }
}

/// Store whose every operation fails.
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<ToolResult>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn put(&self, _key: &str, _value: ToolResult, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

#[async_trait]
impl IdempotencyStore for BrokenStore {
    async fn claim(&self, _key: &str, _ttl: Duration) -> Result<IdempotencyClaim, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn complete(&self, _key: &str, _result: &ToolResult, _ttl: Duration) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn release(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// `None` marks a claim in flight.
#[derive(Default)]
pub struct MemoryIdempotency {
    entries: Mutex<HashMap<String, Option<ToolResult>>>,
}

#[async_trait]
impl IdempotencyStore for MemoryIdempotency {
    async fn claim(&self, key: &str, _ttl: Duration) -> Result<IdempotencyClaim, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        Ok(match entries.get(key) {
            Some(Some(result)) => IdempotencyClaim::Completed(result.clone()),
            Some(None) => IdempotencyClaim::InFlight,
            None => {
                entries.insert(key.to_string(), None);
                IdempotencyClaim::Claimed
            }
        })
    }

    async fn complete(&self, key: &str, result: &ToolResult, _ttl: Duration) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), Some(result.clone()));
        Ok(())
    }

    async fn release(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// Counter that never resets; `reset_after` is the whole window.
#[derive(Default)]
pub struct CountingLimiter {
    counts: Mutex<HashMap<String, u32>>,
}

#[async_trait]
impl RateLimitStore for CountingLimiter {
    async fn increment(&self, key: &str, window: Duration) -> Result<RateLimitCounter, StoreError> {
        let mut counts = self.counts.lock().unwrap();
        let count = counts.entry(key.to_string()).or_insert(0);
        *count += 1;
        Ok(RateLimitCounter {
            count: *count,
            reset_after: window,
        })
    }
}

#[derive(Default)]
pub struct RecordingSink {
    records: Mutex<Vec<ExecutionRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<ExecutionRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn outcomes(&self) -> Vec<ExecutionOutcome> {
        self.records().iter().map(|r| r.outcome).collect()
    }
}

impl TelemetrySink for RecordingSink {
    fn record(&self, record: &ExecutionRecord) {
        self.records.lock().unwrap().push(record.clone());
    }
}

/// Reports memory growing by `step` bytes on every read.
pub struct SteppingProbe {
    next: AtomicU64,
    step: u64,
}

impl SteppingProbe {
    pub fn new(step: u64) -> Self {
        Self {
            next: AtomicU64::new(1 << 20),
            step,
        }
    }
}

impl MemoryProbe for SteppingProbe {
    fn current_bytes(&self) -> Option<u64> {
        Some(self.next.fetch_add(self.step, Ordering::SeqCst))
    }
}
