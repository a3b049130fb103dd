//! Candidate extraction, selection and argument mapping.

use std::collections::BTreeMap;

use serde_json::Value;

use super::declaration::SelectStrategy;
use super::path::PathExpr;
use crate::core::error::DomainError;
use crate::tool::entities::Arguments;

/// Keys probed, in order, for a list inside an object result.
pub const LIST_KEYS: [&str; 5] = ["teams", "data", "items", "results", "list"];

/// Outcome of applying a [`SelectStrategy`]
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Selected(Value),
    /// Zero or several candidates (or the strategy always asks)
    NeedsUserInput { candidates: usize },
}

/// Turn a resolver payload into a candidate list.
///
/// An array of objects is used as is; an object is probed for
/// [`LIST_KEYS`]; anything else becomes a single candidate.
pub fn extract_candidates(data: &Value) -> Vec<Value> {
    match data {
        Value::Array(items) if items.iter().all(Value::is_object) => items.clone(),
        Value::Object(map) => LIST_KEYS
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(Value::Array(items)) => Some(items.clone()),
                _ => None,
            })
            .unwrap_or_else(|| vec![data.clone()]),
        other => vec![other.clone()],
    }
}

pub fn select(
    strategy: SelectStrategy,
    resolver_tool: &str,
    mut candidates: Vec<Value>,
) -> Result<Selection, DomainError> {
    let count = candidates.len();
    match strategy {
        SelectStrategy::AskUser => Ok(Selection::NeedsUserInput { candidates: count }),
        SelectStrategy::AutoIfSingle if count == 1 => Ok(Selection::Selected(candidates.remove(0))),
        SelectStrategy::AutoIfSingle => Ok(Selection::NeedsUserInput { candidates: count }),
        SelectStrategy::Fail if count == 1 => Ok(Selection::Selected(candidates.remove(0))),
        SelectStrategy::Fail => Err(DomainError::SelectionFailed {
            tool: resolver_tool.to_string(),
            count,
        }),
    }
}

/// Copy mapped values into `arguments`.
///
/// Each path is evaluated on the selected candidate first and then on the
/// resolver's full payload. Unparsable or unresolvable paths and null
/// values are skipped. Returns the number of fields set.
pub fn apply_mapping(
    map: &BTreeMap<String, String>,
    candidate: &Value,
    payload: &Value,
    arguments: &mut Arguments,
) -> usize {
    let mut applied = 0;
    for (target, expression) in map {
        let path = match PathExpr::parse(expression) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(field = %target, error = %e, "Skipping unparsable mapping");
                continue;
            }
        };

        let value = path
            .evaluate(candidate)
            .or_else(|| path.evaluate(payload))
            .filter(|v| !v.is_null());

        match value {
            Some(value) => {
                arguments.insert(target.clone(), value.clone());
                applied += 1;
            }
            None => {
                tracing::debug!(field = %target, path = %path, "Mapping path did not resolve");
            }
        }
    }
    applied
}
