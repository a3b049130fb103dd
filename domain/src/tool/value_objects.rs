//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of every tool invocation.
//! A tool call always produces a [`ToolResult`]; failures are carried as
//! data via [`ToolError`] rather than propagated as Rust errors.
//!
//! | Code | Produced by |
//! |------|-------------|
//! | `TOOL_NOT_FOUND` | Registry lookup miss |
//! | `VALIDATION_ERROR` | Schema validation (lists every violated field) |
//! | `RATE_LIMITED` | Rate limiter, with a retry-after hint |
//! | `EXECUTION_ERROR` | Any uncaught failure inside a tool body |
//! | `MAX_DEPTH_EXCEEDED` | Orchestrator depth guard |
//! | `DUPLICATE_IN_FLIGHT` | Identical idempotent request still running |

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::entities::Arguments;

/// Error carried inside a failed [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "TOOL_NOT_FOUND", "VALIDATION_ERROR")
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Structured details (per-field violations, failure category, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ToolError {
    pub const TOOL_NOT_FOUND: &'static str = "TOOL_NOT_FOUND";
    pub const VALIDATION_ERROR: &'static str = "VALIDATION_ERROR";
    pub const RATE_LIMITED: &'static str = "RATE_LIMITED";
    pub const EXECUTION_ERROR: &'static str = "EXECUTION_ERROR";
    pub const MAX_DEPTH_EXCEEDED: &'static str = "MAX_DEPTH_EXCEEDED";
    pub const DUPLICATE_IN_FLIGHT: &'static str = "DUPLICATE_IN_FLIGHT";

    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    // Common error constructors
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        Self::new(
            Self::TOOL_NOT_FOUND,
            format!("Tool not found: {}", name.into()),
        )
    }

    /// Validation failure listing every violated field.
    pub fn validation(violations: &[FieldViolation]) -> Self {
        let summary = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(
            Self::VALIDATION_ERROR,
            format!("Invalid arguments: {}", summary),
        )
        .with_details(serde_json::json!({ "fields": violations }))
    }

    pub fn rate_limited(tool_name: &str, retry_after_ms: u64) -> Self {
        Self::new(
            Self::RATE_LIMITED,
            format!(
                "Rate limit exceeded for '{}'; retry after {} ms",
                tool_name, retry_after_ms
            ),
        )
        .with_details(serde_json::json!({ "retry_after_ms": retry_after_ms }))
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(Self::EXECUTION_ERROR, message)
    }

    pub fn max_depth_exceeded(tool_name: &str) -> Self {
        Self::new(
            Self::MAX_DEPTH_EXCEEDED,
            format!("Maximum dependency depth exceeded before '{}'", tool_name),
        )
    }

    pub fn duplicate_in_flight(tool_name: &str) -> Self {
        Self::new(
            Self::DUPLICATE_IN_FLIGHT,
            format!(
                "An identical request to '{}' is already being processed",
                tool_name
            ),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// One violated field reported by schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl FieldViolation {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: "is required".to_string(),
        }
    }

    pub fn wrong_type(field: impl Into<String>, expected: &str) -> Self {
        Self {
            field: field.into(),
            reason: format!("must be of type {}", expected),
        }
    }
}

impl std::fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{}' {}", self.field, self.reason)
    }
}

/// Classification of an uncaught tool failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Authorization,
    Timeout,
    RateLimit,
    Execution,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Authorization => "authorization",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::RateLimit => "rate_limit",
            ErrorCategory::Execution => "execution",
        }
    }

    /// Classify a failure message. Checked in priority order:
    /// validation, authorization, timeout, rate limit, then execution.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

        if has(&["validation", "invalid", "required", "must be"]) {
            ErrorCategory::Validation
        } else if has(&["unauthorized", "unauthorised", "forbidden", "permission", "access denied"]) {
            ErrorCategory::Authorization
        } else if has(&["timeout", "timed out", "deadline"]) {
            ErrorCategory::Timeout
        } else if has(&["rate limit", "too many requests", "throttl"]) {
            ErrorCategory::RateLimit
        } else {
            ErrorCategory::Execution
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure escaping a tool body.
///
/// Tools report expected outcomes (including domain errors) as a
/// [`ToolResult`]; `ToolFailure` is for everything they could not handle.
/// The executor converts it into an `EXECUTION_ERROR` result.
#[derive(Debug, Error)]
pub enum ToolFailure {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ToolFailure {
    pub fn failed(message: impl Into<String>) -> Self {
        ToolFailure::Failed(message.into())
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolFailure::InvalidInput(_) => ErrorCategory::Validation,
            ToolFailure::Unauthorized(_) => ErrorCategory::Authorization,
            ToolFailure::Timeout(_) => ErrorCategory::Timeout,
            ToolFailure::RateLimited(_) => ErrorCategory::RateLimit,
            ToolFailure::Failed(_) | ToolFailure::Other(_) => {
                ErrorCategory::classify(&self.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for ToolFailure {
    fn from(err: serde_json::Error) -> Self {
        ToolFailure::Other(Box::new(err))
    }
}

/// Result of a tool invocation: the universal return type of every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Whether the execution was successful
    pub success: bool,
    /// Payload (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about a tool execution.
///
/// Pipeline fields are filled in by the executor; `extra` carries whatever
/// the tool itself chose to attach.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Served from the result cache
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cache_hit: bool,
    /// Replayed from the idempotency store
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub duplicate: bool,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub retry_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    /// Category of an uncaught failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_ms: Option<u64>,
    /// Tool-supplied metadata
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub extra: Arguments,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, data: impl Into<Value>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            data: Some(data.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            data: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add metadata to the result
    pub fn with_metadata(mut self, metadata: ToolResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach a tool-supplied metadata entry
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.extra.insert(key.into(), value.into());
        self
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get the payload
    pub fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Get the error
    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Error code of a failed result
    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_error_constructors() {
        let err = ToolError::tool_not_found("nonexistent.tool");
        assert_eq!(err.code, "TOOL_NOT_FOUND");
        assert!(err.message.contains("nonexistent.tool"));

        let err = ToolError::rate_limited("core.teams.GET", 1500);
        assert_eq!(err.code, "RATE_LIMITED");
        assert_eq!(err.details.unwrap()["retry_after_ms"], 1500);
    }

    #[test]
    fn test_validation_error_lists_every_field() {
        let err = ToolError::validation(&[
            FieldViolation::missing("team_id"),
            FieldViolation::wrong_type("limit", "integer"),
        ]);

        assert_eq!(err.code, "VALIDATION_ERROR");
        assert!(err.message.contains("'team_id' is required"));
        assert!(err.message.contains("'limit' must be of type integer"));
        let fields = err.details.unwrap()["fields"].as_array().unwrap().len();
        assert_eq!(fields, 2);
    }

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(
            ErrorCategory::classify("Invalid token: permission denied"),
            ErrorCategory::Validation
        );
        assert_eq!(
            ErrorCategory::classify("Forbidden: request timed out"),
            ErrorCategory::Authorization
        );
        assert_eq!(
            ErrorCategory::classify("upstream timeout after rate limit"),
            ErrorCategory::Timeout
        );
        assert_eq!(
            ErrorCategory::classify("429 Too Many Requests"),
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorCategory::classify("connection reset"),
            ErrorCategory::Execution
        );
    }

    #[test]
    fn test_failure_category() {
        assert_eq!(
            ToolFailure::Unauthorized("nope".into()).category(),
            ErrorCategory::Authorization
        );
        assert_eq!(
            ToolFailure::failed("database unreachable").category(),
            ErrorCategory::Execution
        );
        assert_eq!(
            ToolFailure::failed("query timed out").category(),
            ErrorCategory::Timeout
        );
    }

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("echo", json!({"echo": "hi"})).with_extra("source", "test");

        assert!(result.is_success());
        assert_eq!(result.data().unwrap()["echo"], "hi");
        assert!(result.error().is_none());
        assert_eq!(result.metadata.extra["source"], "test");
    }

    #[test]
    fn test_tool_result_failure() {
        let result = ToolResult::failure("echo", ToolError::execution("boom"));

        assert!(!result.is_success());
        assert!(result.data().is_none());
        assert_eq!(result.error_code(), Some("EXECUTION_ERROR"));
    }

    #[test]
    fn test_metadata_flags_are_omitted_when_unset() {
        let result = ToolResult::success("echo", json!(1));
        let value = serde_json::to_value(&result).unwrap();
        assert!(value["metadata"].get("cache_hit").is_none());
        assert!(value["metadata"].get("retry_count").is_none());

        let mut flagged = result.clone();
        flagged.metadata.cache_hit = true;
        let back: ToolResult =
            serde_json::from_value(serde_json::to_value(&flagged).unwrap()).unwrap();
        assert!(back.metadata.cache_hit);
    }
}
