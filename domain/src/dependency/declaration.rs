//! Declarative dependency DSL.
//!
//! ```json
//! {
//!   "requires": ["team_id"],
//!   "resolver_tool": "core.teams.GET",
//!   "select_strategy": "auto_if_single",
//!   "map": { "team_id": "$.teams[0].id" }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::selection::{Selection, apply_mapping, extract_candidates, select};
use super::tool_dependency::{MergeOutcome, ToolDependency};
use crate::core::error::DomainError;
use crate::tool::entities::Arguments;
use crate::tool::value_objects::ToolResult;

/// Policy for turning a resolver's list into a single value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectStrategy {
    /// Exactly one candidate is used; otherwise ask the user
    #[default]
    AutoIfSingle,
    /// Always defer to the user
    AskUser,
    /// Exactly one candidate is used; otherwise raise
    Fail,
}

/// Fields a tool needs, and how to fetch them from another tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyDeclaration {
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver_tool: Option<String>,
    #[serde(default)]
    pub select_strategy: SelectStrategy,
    /// Target argument → path expression
    #[serde(default)]
    pub map: BTreeMap<String, String>,
}

impl DependencyDeclaration {
    pub fn new(resolver_tool: impl Into<String>) -> Self {
        Self {
            resolver_tool: Some(resolver_tool.into()),
            ..Self::default()
        }
    }

    pub fn requires(mut self, field: impl Into<String>) -> Self {
        self.requires.push(field.into());
        self
    }

    pub fn with_strategy(mut self, strategy: SelectStrategy) -> Self {
        self.select_strategy = strategy;
        self
    }

    pub fn map_field(mut self, target: impl Into<String>, path: impl Into<String>) -> Self {
        self.map.insert(target.into(), path.into());
        self
    }

    /// Required fields that are absent or null in `arguments`, in order.
    pub fn missing_fields(&self, arguments: &Arguments) -> Vec<String> {
        self.requires
            .iter()
            .filter(|field| arguments.get(*field).is_none_or(Value::is_null))
            .cloned()
            .collect()
    }

    /// Fold a resolver result into `arguments`.
    ///
    /// Extracts candidates, applies the strategy and the field map. The
    /// merge only counts when every required field ends up present;
    /// anything less is reported as [`MergeOutcome::NeedsUserInput`].
    pub fn merge_result(
        &self,
        arguments: &Arguments,
        result: &ToolResult,
    ) -> Result<MergeOutcome, DomainError> {
        let resolver = self.resolver_tool.as_deref().unwrap_or(&result.tool_name);
        let payload = result.data().cloned().unwrap_or(Value::Null);

        let candidate = match select(self.select_strategy, resolver, extract_candidates(&payload))? {
            Selection::Selected(candidate) => candidate,
            Selection::NeedsUserInput { candidates } => {
                tracing::debug!(resolver = %resolver, candidates, "Selection needs user input");
                return Ok(MergeOutcome::NeedsUserInput);
            }
        };

        let mut merged = arguments.clone();
        apply_mapping(&self.map, &candidate, &payload, &mut merged);

        let still_missing = self.missing_fields(&merged);
        if still_missing.is_empty() {
            Ok(MergeOutcome::Merged(merged))
        } else {
            tracing::warn!(
                resolver = %resolver,
                missing = ?still_missing,
                "Resolver output did not supply every required field"
            );
            Ok(MergeOutcome::NeedsUserInput)
        }
    }

    /// Express this declaration as a callback-shaped [`ToolDependency`].
    ///
    /// The dependency only runs while a required field is missing and
    /// merges through [`merge_result`](Self::merge_result). Returns `None`
    /// without a resolver tool.
    pub fn to_dependency(&self) -> Option<ToolDependency> {
        let resolver = self.resolver_tool.clone()?;
        let condition = self.clone();
        let merger = self.clone();
        Some(
            ToolDependency::new(resolver)
                .when(move |arguments, _| !condition.missing_fields(arguments).is_empty())
                .merge_with(move |arguments, result| merger.merge_result(arguments, result)),
        )
    }
}
