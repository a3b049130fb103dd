//! Execute Tool use case.
//!
//! The only place a tool body actually runs. Each call goes through a fixed
//! pipeline where any stage may short-circuit with an error result:
//!
//! ```text
//! lookup → idempotency claim → rate limit → validation → cache → execute
//!                                                                  │
//!                             timeout + panic isolation + retries ─┘
//! ```
//!
//! Every call ends with exactly one [`ExecutionRecord`] sent to the
//! telemetry sink. Stores are optional; an absent or failing store is
//! skipped with a log line and the pipeline carries on without it.

use crate::config::ExecutorConfig;
use crate::ports::stores::{CacheStore, IdempotencyClaim, IdempotencyStore, RateLimitStore};
use crate::ports::telemetry::{
    ExecutionOutcome, ExecutionRecord, MemoryProbe, NoMemoryProbe, NoTelemetry, TelemetrySink,
};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::shared::{cache_key, idempotency_key, panic_message};
use async_trait::async_trait;
use conductor_domain::tool::{
    Arguments, DefaultToolValidator, ErrorCategory, Tool, ToolContext, ToolDiscovery, ToolError,
    ToolFailure, ToolMetadata, ToolRegistry, ToolResult, ToolValidator,
};
use futures::FutureExt;
use serde_json::json;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of the idempotency stage
enum ClaimStep {
    /// Run the tool; holds the claimed key when a claim was taken
    Proceed(Option<String>),
    /// Answer without running the tool
    Done(ToolResult, ExecutionOutcome),
}

/// Use case running a single tool call through the executor pipeline.
pub struct ExecuteToolUseCase {
    registry: Arc<ToolRegistry>,
    validator: Arc<dyn ToolValidator>,
    config: ExecutorConfig,
    cache: Option<Arc<dyn CacheStore>>,
    rate_limiter: Option<Arc<dyn RateLimitStore>>,
    idempotency: Option<Arc<dyn IdempotencyStore>>,
    telemetry: Arc<dyn TelemetrySink>,
    memory: Arc<dyn MemoryProbe>,
}

impl ExecuteToolUseCase {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            validator: Arc::new(DefaultToolValidator),
            config: ExecutorConfig::default(),
            cache: None,
            rate_limiter: None,
            idempotency: None,
            telemetry: Arc::new(NoTelemetry),
            memory: Arc::new(NoMemoryProbe),
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn ToolValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_cache(mut self, cache: Arc<dyn CacheStore>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimitStore>) -> Self {
        self.rate_limiter = Some(rate_limiter);
        self
    }

    pub fn with_idempotency_store(mut self, store: Arc<dyn IdempotencyStore>) -> Self {
        self.idempotency = Some(store);
        self
    }

    pub fn with_telemetry(mut self, telemetry: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = telemetry;
        self
    }

    pub fn with_memory_probe(mut self, memory: Arc<dyn MemoryProbe>) -> Self {
        self.memory = memory;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Run `tool_name` and report the call to telemetry.
    pub async fn execute(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> ToolResult {
        let started = Instant::now();
        let memory_before = self.memory.current_bytes();
        let trace_id = context
            .trace_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let (mut result, outcome) = self
            .run_pipeline(tool_name, arguments, context, &trace_id)
            .await;

        result.metadata.duration_ms = Some(started.elapsed().as_millis() as u64);
        result.metadata.trace_id = Some(trace_id);

        let memory_delta = match (memory_before, self.memory.current_bytes()) {
            (Some(before), Some(after)) => after as i64 - before as i64,
            _ => 0,
        };

        log_outcome(&result, outcome);
        let record = ExecutionRecord::from_result(arguments, context, &result, outcome)
            .with_memory_delta(memory_delta);
        self.telemetry.record(&record);

        result
    }

    async fn run_pipeline(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
        trace_id: &str,
    ) -> (ToolResult, ExecutionOutcome) {
        // 1. Lookup
        let Some(tool) = self.registry.get(tool_name) else {
            return (
                ToolResult::failure(tool_name, ToolError::tool_not_found(tool_name)),
                ExecutionOutcome::Rejected,
            );
        };
        let name = tool.name().to_string();
        let metadata = ToolDiscovery::tool_metadata(tool.as_ref());

        // 2. Idempotency
        let claimed = if metadata.idempotent {
            match self.claim(&name, arguments, context).await {
                ClaimStep::Proceed(key) => key,
                ClaimStep::Done(result, outcome) => return (result, outcome),
            }
        } else {
            None
        };

        let (mut result, outcome) = self
            .run_guarded(tool.as_ref(), &metadata, arguments, context, trace_id)
            .await;

        if let Some(key) = claimed {
            self.settle_claim(&key, &result).await;
            result.metadata.idempotency_key = Some(key);
        }

        (result, outcome)
    }

    /// Stages 3 to 6; runs while an idempotency claim (if any) is held.
    async fn run_guarded(
        &self,
        tool: &dyn Tool,
        metadata: &ToolMetadata,
        arguments: &Arguments,
        context: &ToolContext,
        trace_id: &str,
    ) -> (ToolResult, ExecutionOutcome) {
        let name = tool.name();

        // 3. Rate limit
        if let Some(rejection) = self.check_rate_limit(name, context).await {
            return (rejection, ExecutionOutcome::Rejected);
        }

        // 4. Validation
        if let Err(violations) = self.validator.validate(arguments, tool.schema()) {
            debug!(tool = %name, violations = violations.len(), "Arguments failed validation");
            return (
                ToolResult::failure(name, ToolError::validation(&violations)),
                ExecutionOutcome::Rejected,
            );
        }

        // 5. Cache (read-only tools)
        let cache = match &self.cache {
            Some(store) if metadata.read_only => Some((store, cache_key(name, arguments, context))),
            _ => None,
        };
        if let Some((store, key)) = &cache {
            match store.get(key).await {
                Ok(Some(hit)) => {
                    let mut hit = replayed(hit);
                    hit.metadata.cache_hit = true;
                    return (hit, ExecutionOutcome::CacheHit);
                }
                Ok(None) => {}
                Err(e) => warn!(tool = %name, error = %e, "Cache lookup failed; executing"),
            }
        }

        // 6. Execute
        let result = self.invoke_with_retries(tool, metadata, arguments, context, trace_id).await;
        if !result.is_success() {
            return (result, ExecutionOutcome::Failure);
        }

        if let Some((store, key)) = cache
            && let Err(e) = store.put(&key, result.clone(), self.config.cache_ttl).await
        {
            warn!(tool = %name, error = %e, "Failed to cache result");
        }
        (result, ExecutionOutcome::Success)
    }

    async fn claim(&self, name: &str, arguments: &Arguments, context: &ToolContext) -> ClaimStep {
        let Some(store) = &self.idempotency else {
            return ClaimStep::Proceed(None);
        };
        let key = idempotency_key(name, arguments, context);

        match store.claim(&key, self.config.idempotency_ttl).await {
            Ok(IdempotencyClaim::Claimed) => ClaimStep::Proceed(Some(key)),
            Ok(IdempotencyClaim::Completed(stored)) => {
                debug!(tool = %name, key = %key, "Replaying stored result for duplicate request");
                let mut stored = replayed(stored);
                stored.metadata.duplicate = true;
                stored.metadata.idempotency_key = Some(key);
                ClaimStep::Done(stored, ExecutionOutcome::Duplicate)
            }
            Ok(IdempotencyClaim::InFlight) => {
                let mut result = ToolResult::failure(name, ToolError::duplicate_in_flight(name));
                result.metadata.idempotency_key = Some(key);
                ClaimStep::Done(result, ExecutionOutcome::Rejected)
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Idempotency store unavailable; executing without a claim");
                ClaimStep::Proceed(None)
            }
        }
    }

    /// Store a successful result under the claimed key, or give the key up.
    async fn settle_claim(&self, key: &str, result: &ToolResult) {
        let Some(store) = &self.idempotency else {
            return;
        };
        let settled = if result.is_success() {
            store.complete(key, result, self.config.idempotency_ttl).await
        } else {
            store.release(key).await
        };
        if let Err(e) = settled {
            warn!(tool = %result.tool_name, key = %key, error = %e, "Failed to settle idempotency claim");
        }
    }

    async fn check_rate_limit(&self, name: &str, context: &ToolContext) -> Option<ToolResult> {
        let store = self.rate_limiter.as_ref()?;
        let limits = &self.config.rate_limit;
        let key = format!("{}:{}", name, context.scope_key());

        match store.increment(&key, limits.window).await {
            Ok(counter) if counter.count > limits.limit_for(name, &self.registry) => {
                let retry_after_ms = counter.reset_after.as_millis() as u64;
                let mut result =
                    ToolResult::failure(name, ToolError::rate_limited(name, retry_after_ms));
                result.metadata.retry_after_ms = Some(retry_after_ms);
                Some(result)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(tool = %name, error = %e, "Rate limit store unavailable; not limiting");
                None
            }
        }
    }

    /// Run the tool body, retrying read-only tools on timeouts.
    async fn invoke_with_retries(
        &self,
        tool: &dyn Tool,
        metadata: &ToolMetadata,
        arguments: &Arguments,
        context: &ToolContext,
        trace_id: &str,
    ) -> ToolResult {
        let name = tool.name();
        let timeout = self.config.timeout_for(name, &self.registry);
        let max_retries = if metadata.read_only {
            self.config.max_retries
        } else {
            0
        };

        let mut retry_count = 0;
        loop {
            match invoke(tool, arguments, context, timeout).await {
                Ok(mut result) => {
                    result.metadata.retry_count = retry_count;
                    return result;
                }
                Err(failure) => {
                    let category = failure.category();
                    if category == ErrorCategory::Timeout && retry_count < max_retries {
                        retry_count += 1;
                        warn!(tool = %name, attempt = retry_count, max_retries, "Retrying after timeout");
                        continue;
                    }

                    let error = ToolError::execution(failure.to_string())
                        .with_details(json!({ "trace_id": trace_id, "category": category }));
                    let mut result = ToolResult::failure(name, error);
                    result.metadata.category = Some(category);
                    result.metadata.retry_count = retry_count;
                    return result;
                }
            }
        }
    }
}

#[async_trait]
impl ToolExecutorPort for ExecuteToolUseCase {
    fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    async fn execute(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> ToolResult {
        ExecuteToolUseCase::execute(self, tool_name, arguments, context).await
    }
}

/// One attempt: the tool body under a timeout, with panics caught.
async fn invoke(
    tool: &dyn Tool,
    arguments: &Arguments,
    context: &ToolContext,
    timeout: Duration,
) -> Result<ToolResult, ToolFailure> {
    let call = AssertUnwindSafe(tool.execute(arguments, context)).catch_unwind();
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(panic)) => Err(ToolFailure::failed(format!(
            "tool panicked: {}",
            panic_message(panic.as_ref())
        ))),
        Err(_) => Err(ToolFailure::Timeout(format!(
            "'{}' did not finish within {} ms",
            tool.name(),
            timeout.as_millis()
        ))),
    }
}

/// A stored result answering this call: the metadata describing how the
/// original call ran is cleared.
fn replayed(mut result: ToolResult) -> ToolResult {
    let metadata = &mut result.metadata;
    metadata.retry_count = 0;
    metadata.category = None;
    metadata.retry_after_ms = None;
    metadata.cache_hit = false;
    metadata.duplicate = false;
    metadata.idempotency_key = None;
    result
}

fn log_outcome(result: &ToolResult, outcome: ExecutionOutcome) {
    let metadata = &result.metadata;
    let trace_id = metadata.trace_id.as_deref().unwrap_or_default();
    if outcome.is_failure() {
        warn!(
            tool = %result.tool_name,
            trace_id = %trace_id,
            outcome = %outcome,
            code = result.error_code().unwrap_or_default(),
            message = result.error().map(|e| e.message.as_str()).unwrap_or_default(),
            "Tool call failed"
        );
    } else {
        debug!(
            tool = %result.tool_name,
            trace_id = %trace_id,
            outcome = %outcome,
            duration_ms = metadata.duration_ms.unwrap_or_default(),
            "Tool call finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RateLimitConfig;
    use crate::use_cases::test_support::*;
    use conductor_domain::tool::{PropertyType, ToolSchema};
    use serde_json::json;

    fn executor(tools: Vec<Arc<ScriptedTool>>) -> ExecuteToolUseCase {
        ExecuteToolUseCase::new(registry_with(tools))
    }

    #[tokio::test]
    async fn test_echo_success() {
        let executor = executor(vec![echo_tool()]);
        let result = executor
            .execute("echo", &args(json!({"message": "hi"})), &ToolContext::new())
            .await;

        assert!(result.is_success());
        assert_eq!(result.data(), Some(&json!({"echo": "hi"})));
        assert!(result.metadata.duration_ms.is_some());
        assert!(result.metadata.trace_id.is_some());
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![]).with_telemetry(sink.clone());

        let result = executor
            .execute("nonexistent.tool", &Arguments::new(), &ToolContext::new())
            .await;

        assert_eq!(result.error_code(), Some(ToolError::TOOL_NOT_FOUND));
        assert_eq!(sink.outcomes(), vec![ExecutionOutcome::Rejected]);
    }

    #[tokio::test]
    async fn test_legacy_name_runs_canonical_tool() {
        let tool = Arc::new(ScriptedTool::returning("core.teams.GET", json!({"teams": []})));
        let executor = executor(vec![tool.clone()]);

        let result = executor
            .execute("core.teams.list", &Arguments::new(), &ToolContext::new())
            .await;

        assert!(result.is_success());
        assert_eq!(tool.calls(), 1);
    }

    #[tokio::test]
    async fn test_trace_id_taken_from_context() {
        let executor = executor(vec![echo_tool()]);
        let context = ToolContext::new().with_trace_id("req-42");
        let result = executor.execute("echo", &Arguments::new(), &context).await;
        assert_eq!(result.metadata.trace_id.as_deref(), Some("req-42"));
    }

    #[tokio::test]
    async fn test_validation_reports_every_field_without_running() {
        let tool = Arc::new(
            ScriptedTool::echoing("core.team_members.GET").with_schema(
                ToolSchema::new()
                    .required_property("team_id", PropertyType::Integer, "Team")
                    .property("limit", PropertyType::Integer, "Page size"),
            ),
        );
        let executor = executor(vec![tool.clone()]);

        let result = executor
            .execute(
                "core.team_members.GET",
                &args(json!({"limit": "ten"})),
                &ToolContext::new(),
            )
            .await;

        assert_eq!(result.error_code(), Some(ToolError::VALIDATION_ERROR));
        let fields = &result.error().unwrap().details.as_ref().unwrap()["fields"];
        assert_eq!(fields.as_array().unwrap().len(), 2);
        assert_eq!(tool.calls(), 0);
    }

    #[tokio::test]
    async fn test_idempotent_tool_runs_once() {
        let tool = Arc::new(
            ScriptedTool::returning("core.teams.POST", json!({"id": 1}))
                .with_metadata(ToolMetadata::action().idempotent()),
        );
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![tool.clone()])
            .with_idempotency_store(Arc::new(MemoryIdempotency::default()))
            .with_telemetry(sink.clone());
        let context = ToolContext::new().with_principal("u1");
        let arguments = args(json!({"name": "Acme"}));

        let first = executor.execute("core.teams.POST", &arguments, &context).await;
        let second = executor.execute("core.teams.POST", &arguments, &context).await;

        assert_eq!(tool.calls(), 1);
        assert!(!first.metadata.duplicate);
        assert!(second.metadata.duplicate);
        assert_eq!(second.data(), first.data());
        assert_eq!(first.metadata.idempotency_key, second.metadata.idempotency_key);
        assert_eq!(
            sink.outcomes(),
            vec![ExecutionOutcome::Success, ExecutionOutcome::Duplicate]
        );
    }

    #[tokio::test]
    async fn test_idempotency_is_scoped_by_caller_and_arguments() {
        let tool = Arc::new(
            ScriptedTool::returning("core.teams.POST", json!({"id": 1}))
                .with_metadata(ToolMetadata::action().idempotent()),
        );
        let executor = executor(vec![tool.clone()])
            .with_idempotency_store(Arc::new(MemoryIdempotency::default()));

        let alice = ToolContext::new().with_principal("alice");
        let bob = ToolContext::new().with_principal("bob");
        executor.execute("core.teams.POST", &args(json!({"name": "A"})), &alice).await;
        executor.execute("core.teams.POST", &args(json!({"name": "A"})), &bob).await;
        executor.execute("core.teams.POST", &args(json!({"name": "B"})), &alice).await;

        assert_eq!(tool.calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_is_rejected_in_flight() {
        let tool = Arc::new(
            ScriptedTool::returning("core.teams.POST", json!({"id": 1}))
                .with_metadata(ToolMetadata::action().idempotent())
                .with_delay(Duration::from_millis(50)),
        );
        let executor = executor(vec![tool.clone()])
            .with_idempotency_store(Arc::new(MemoryIdempotency::default()));
        let context = ToolContext::new();
        let arguments = Arguments::new();

        let (a, b) = tokio::join!(
            executor.execute("core.teams.POST", &arguments, &context),
            executor.execute("core.teams.POST", &arguments, &context),
        );

        assert_eq!(tool.calls(), 1);
        let codes: Vec<_> = [a.error_code(), b.error_code()].into_iter().flatten().collect();
        assert_eq!(codes, vec![ToolError::DUPLICATE_IN_FLIGHT]);
    }

    #[tokio::test]
    async fn test_failed_idempotent_call_releases_claim() {
        let tool = Arc::new(
            ScriptedTool::new("core.teams.POST", |_| Err(ToolFailure::failed("db down")))
                .with_metadata(ToolMetadata::action().idempotent()),
        );
        let executor = executor(vec![tool.clone()])
            .with_idempotency_store(Arc::new(MemoryIdempotency::default()));

        for _ in 0..2 {
            let result = executor
                .execute("core.teams.POST", &Arguments::new(), &ToolContext::new())
                .await;
            assert_eq!(result.error_code(), Some(ToolError::EXECUTION_ERROR));
        }
        assert_eq!(tool.calls(), 2);
    }

    #[tokio::test]
    async fn test_rate_limited_without_running() {
        let tool = Arc::new(ScriptedTool::returning("core.teams.GET", json!([])));
        let executor = executor(vec![tool.clone()])
            .with_rate_limiter(Arc::new(CountingLimiter::default()))
            .with_config(ExecutorConfig::default().with_rate_limit(
                RateLimitConfig::default()
                    .with_tool_limit("core.teams.GET", 1)
                    .with_window(Duration::from_secs(30)),
            ));
        let context = ToolContext::new().with_principal("u1");

        let first = executor.execute("core.teams.GET", &Arguments::new(), &context).await;
        let second = executor.execute("core.teams.GET", &Arguments::new(), &context).await;

        assert!(first.is_success());
        assert_eq!(second.error_code(), Some(ToolError::RATE_LIMITED));
        assert_eq!(second.metadata.retry_after_ms, Some(30_000));
        assert_eq!(tool.calls(), 1);

        let other = ToolContext::new().with_principal("u2");
        let third = executor.execute("core.teams.GET", &Arguments::new(), &other).await;
        assert!(third.is_success());
    }

    #[tokio::test]
    async fn test_read_only_results_are_cached() {
        let tool = Arc::new(ScriptedTool::returning("core.teams.GET", json!({"teams": []})));
        let cache = Arc::new(MemoryCache::default());
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![tool.clone()])
            .with_cache(cache.clone())
            .with_telemetry(sink.clone());

        let first = executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;
        let second = executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(tool.calls(), 1);
        assert!(!first.metadata.cache_hit);
        assert!(second.metadata.cache_hit);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            sink.outcomes(),
            vec![ExecutionOutcome::Success, ExecutionOutcome::CacheHit]
        );
    }

    #[tokio::test]
    async fn test_write_and_failed_results_are_not_cached() {
        let write = Arc::new(ScriptedTool::returning("core.teams.POST", json!({"id": 1})));
        let failing = Arc::new(ScriptedTool::new("core.teams.GET", |_| {
            Ok(ToolResult::failure("core.teams.GET", ToolError::execution("upstream 500")))
        }));
        let cache = Arc::new(MemoryCache::default());
        let executor = executor(vec![write.clone(), failing.clone()]).with_cache(cache.clone());

        for _ in 0..2 {
            executor.execute("core.teams.POST", &Arguments::new(), &ToolContext::new()).await;
            executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;
        }

        assert_eq!(write.calls(), 2);
        assert_eq!(failing.calls(), 2);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_broken_stores_degrade_gracefully() {
        let tool = Arc::new(
            ScriptedTool::returning("core.teams.GET", json!([]))
                .with_metadata(ToolMetadata::query().idempotent()),
        );
        let executor = executor(vec![tool.clone()])
            .with_cache(Arc::new(BrokenStore))
            .with_idempotency_store(Arc::new(BrokenStore));

        let result = executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;

        assert!(result.is_success());
        assert!(result.metadata.idempotency_key.is_none());
        assert_eq!(tool.calls(), 1);
    }

    #[tokio::test]
    async fn test_timeout_becomes_execution_error() {
        let tool = Arc::new(
            ScriptedTool::returning("slow.report.POST", json!({})).with_delay(Duration::from_millis(200)),
        );
        let executor = executor(vec![tool]).with_config(
            ExecutorConfig::default().with_tool_timeout("slow.report.POST", Duration::from_millis(10)),
        );

        let result = executor.execute("slow.report.POST", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(result.error_code(), Some(ToolError::EXECUTION_ERROR));
        assert_eq!(result.metadata.category, Some(ErrorCategory::Timeout));
        let details = result.error().unwrap().details.clone().unwrap();
        assert_eq!(details["category"], "timeout");
        assert_eq!(Some(details["trace_id"].as_str().unwrap()), result.metadata.trace_id.as_deref());
    }

    #[tokio::test]
    async fn test_read_only_timeouts_are_retried() {
        let tool = Arc::new(
            ScriptedTool::returning("slow.report.GET", json!({})).with_delay(Duration::from_millis(200)),
        );
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![tool.clone()])
            .with_telemetry(sink.clone())
            .with_config(
                ExecutorConfig::default()
                    .with_default_timeout(Duration::from_millis(10))
                    .with_max_retries(2),
            );

        let result = executor.execute("slow.report.GET", &Arguments::new(), &ToolContext::new()).await;

        assert!(!result.is_success());
        assert_eq!(tool.calls(), 3);
        assert_eq!(result.metadata.retry_count, 2);
        assert_eq!(sink.records()[0].retry_count, 2);
    }

    #[tokio::test]
    async fn test_panics_are_contained() {
        let tool = Arc::new(ScriptedTool::new("explode", |_| panic!("boom")));
        let executor = executor(vec![tool]);

        let result = executor.execute("explode", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(result.error_code(), Some(ToolError::EXECUTION_ERROR));
        assert!(result.error().unwrap().message.contains("boom"));
    }

    #[tokio::test]
    async fn test_failures_are_classified() {
        let tool = Arc::new(ScriptedTool::new("core.secrets.GET", |_| {
            Err(ToolFailure::Unauthorized("missing scope".to_string()))
        }));
        let executor = executor(vec![tool]);

        let result = executor.execute("core.secrets.GET", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(result.metadata.category, Some(ErrorCategory::Authorization));
    }

    #[tokio::test]
    async fn test_telemetry_record_contents() {
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![echo_tool()])
            .with_telemetry(sink.clone())
            .with_memory_probe(Arc::new(SteppingProbe::new(512)));
        let context = ToolContext::new().with_principal("u1").with_team("t1");

        executor.execute("echo", &args(json!({"message": "hi"})), &context).await;

        let records = sink.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.tool, "echo");
        assert_eq!(record.arguments["message"], "hi");
        assert_eq!(record.principal_id.as_deref(), Some("u1"));
        assert_eq!(record.team_id.as_deref(), Some("t1"));
        assert_eq!(record.memory_delta_bytes, 512);
        assert!(!record.trace_id.is_empty());
    }

    #[tokio::test]
    async fn test_cache_hit_reports_its_own_retries() {
        let tool = Arc::new(
            ScriptedTool::returning("slow.report.GET", json!({"rows": 3}))
                .with_first_call_delay(Duration::from_millis(200)),
        );
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![tool.clone()])
            .with_cache(Arc::new(MemoryCache::default()))
            .with_telemetry(sink.clone())
            .with_config(
                ExecutorConfig::default()
                    .with_default_timeout(Duration::from_millis(50))
                    .with_max_retries(1),
            );

        let first = executor.execute("slow.report.GET", &Arguments::new(), &ToolContext::new()).await;
        let second = executor.execute("slow.report.GET", &Arguments::new(), &ToolContext::new()).await;

        assert!(first.is_success());
        assert_eq!(first.metadata.retry_count, 1);
        assert!(second.metadata.cache_hit);
        assert_eq!(second.metadata.retry_count, 0);
        assert_eq!(tool.calls(), 2);

        let records = sink.records();
        assert_eq!(records[0].retry_count, 1);
        assert_eq!(records[1].outcome, ExecutionOutcome::CacheHit);
        assert_eq!(records[1].retry_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_replay_reports_its_own_retries() {
        let tool = Arc::new(
            ScriptedTool::returning("core.reports.GET", json!({"rows": 3}))
                .with_metadata(ToolMetadata::query().idempotent())
                .with_first_call_delay(Duration::from_millis(200)),
        );
        let sink = Arc::new(RecordingSink::default());
        let executor = executor(vec![tool.clone()])
            .with_idempotency_store(Arc::new(MemoryIdempotency::default()))
            .with_telemetry(sink.clone())
            .with_config(
                ExecutorConfig::default()
                    .with_default_timeout(Duration::from_millis(50))
                    .with_max_retries(1),
            );

        let first = executor.execute("core.reports.GET", &Arguments::new(), &ToolContext::new()).await;
        let second = executor.execute("core.reports.GET", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(first.metadata.retry_count, 1);
        assert!(second.metadata.duplicate);
        assert_eq!(second.metadata.retry_count, 0);
        assert_eq!(second.metadata.idempotency_key, first.metadata.idempotency_key);
        assert_eq!(sink.records()[1].retry_count, 0);
    }

    #[tokio::test]
    async fn test_overrides_written_under_legacy_alias_apply() {
        let tool = Arc::new(
            ScriptedTool::returning("core.teams.GET", json!([])).with_delay(Duration::from_millis(200)),
        );
        let executor = executor(vec![tool.clone()])
            .with_rate_limiter(Arc::new(CountingLimiter::default()))
            .with_config(
                ExecutorConfig::default()
                    .with_tool_timeout("core.teams.list", Duration::from_millis(10))
                    .with_rate_limit(RateLimitConfig::default().with_tool_limit("core.teams.list", 1)),
            );

        let first = executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;
        let second = executor.execute("core.teams.GET", &Arguments::new(), &ToolContext::new()).await;

        assert_eq!(first.metadata.category, Some(ErrorCategory::Timeout));
        assert_eq!(second.error_code(), Some(ToolError::RATE_LIMITED));
        assert_eq!(tool.calls(), 1);
    }
}
