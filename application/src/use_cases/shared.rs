//! Shared utilities for use cases.
//!
//! Canonical JSON and call fingerprints used by the executor for
//! idempotency and cache keys, plus panic containment for tool-authored
//! callbacks.

use conductor_domain::tool::entities::{Arguments, ToolContext};
use serde_json::{Map, Value, json};
use sha2::{Digest, Sha256};
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Rebuild `value` with every object's keys in sorted order.
///
/// Values keep their JSON type, so `1` and `"1"` never canonicalize to the
/// same text.
pub fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), canonicalize(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

/// SHA-256 hex digest of the canonical form of a call.
///
/// Covers the tool name, the arguments and the caller identity (principal
/// and team). The trace id is excluded so retries of the same logical
/// request share a fingerprint.
pub fn call_fingerprint(tool_name: &str, arguments: &Arguments, context: &ToolContext) -> String {
    let document = canonicalize(&json!({
        "tool": tool_name,
        "arguments": arguments,
        "principal": context.principal_id,
        "team": context.team_id,
    }));
    let digest = Sha256::digest(document.to_string().as_bytes());
    format!("{:x}", digest)
}

pub(crate) fn idempotency_key(tool_name: &str, arguments: &Arguments, context: &ToolContext) -> String {
    call_fingerprint(tool_name, arguments, context)
}

pub(crate) fn cache_key(tool_name: &str, arguments: &Arguments, context: &ToolContext) -> String {
    format!("cache:{}", call_fingerprint(tool_name, arguments, context))
}

/// Run a tool-supplied callback, turning a panic into its message.
pub(crate) fn contain_panic<R>(callback: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(callback)).map_err(|panic| panic_message(panic.as_ref()).to_string())
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_canonicalize_sorts_nested_keys() {
        let value = json!({"b": {"z": 1, "a": [{"y": 2, "x": 1}]}, "a": true});
        assert_eq!(
            canonicalize(&value).to_string(),
            r#"{"a":true,"b":{"a":[{"x":1,"y":2}],"z":1}}"#
        );
    }

    #[test]
    fn test_fingerprint_ignores_key_order_and_trace_id() {
        let context = ToolContext::new().with_principal("u1").with_trace_id("t-1");
        let first = call_fingerprint("core.teams.POST", &args(json!({"name": "A", "size": 3})), &context);
        let second = call_fingerprint(
            "core.teams.POST",
            &args(json!({"size": 3, "name": "A"})),
            &context.clone().with_trace_id("t-2"),
        );
        assert_eq!(first, second);
        assert_eq!(first.len(), 64);
    }

    #[test]
    fn test_fingerprint_distinguishes_types_and_callers() {
        let context = ToolContext::new().with_principal("u1");
        let number = call_fingerprint("t", &args(json!({"id": 1})), &context);
        let string = call_fingerprint("t", &args(json!({"id": "1"})), &context);
        let other_user = call_fingerprint("t", &args(json!({"id": 1})), &ToolContext::new().with_principal("u2"));
        assert_ne!(number, string);
        assert_ne!(number, other_user);
    }

    #[test]
    fn test_cache_key_is_namespaced() {
        let context = ToolContext::new();
        let key = cache_key("echo", &Arguments::new(), &context);
        assert!(key.starts_with("cache:"));
        assert_ne!(key, idempotency_key("echo", &Arguments::new(), &context));
    }

    #[test]
    fn test_contain_panic_reports_message() {
        assert_eq!(contain_panic(|| 7), Ok(7));
        assert_eq!(contain_panic(|| -> u8 { panic!("static text") }), Err("static text".to_string()));
        let id = 3;
        assert_eq!(
            contain_panic(|| -> u8 { panic!("formatted {}", id) }),
            Err("formatted 3".to_string())
        );
    }
}
