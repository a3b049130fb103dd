//! Callback-shaped dependency declarations exposed through
//! [`DependencyProvider`](crate::tool::traits::DependencyProvider).

use std::sync::Arc;

use crate::core::error::DomainError;
use crate::tool::entities::{Arguments, ToolContext};
use crate::tool::value_objects::ToolResult;

pub type DependencyCondition = Arc<dyn Fn(&Arguments, &ToolContext) -> bool + Send + Sync>;
pub type ArgumentsBuilder =
    Arc<dyn Fn(&Arguments, &ToolContext) -> Option<Arguments> + Send + Sync>;
pub type ResultMerger =
    Arc<dyn Fn(&Arguments, &ToolResult) -> Result<MergeOutcome, DomainError> + Send + Sync>;

/// Result of folding a dependency's output into the main arguments
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Merged(Arguments),
    /// The output is ambiguous; a human has to choose before continuing
    NeedsUserInput,
}

/// Another tool that must run before the declaring tool.
///
/// - `condition` decides whether the dependency runs at all (default: always)
/// - `args` builds its arguments from the main arguments (default: none)
/// - `merge_result` folds its result back in (default: leave unchanged)
#[derive(Clone)]
pub struct ToolDependency {
    tool_name: String,
    condition: Option<DependencyCondition>,
    args: Option<ArgumentsBuilder>,
    merge_result: Option<ResultMerger>,
}

impl ToolDependency {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            condition: None,
            args: None,
            merge_result: None,
        }
    }

    pub fn when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&Arguments, &ToolContext) -> bool + Send + Sync + 'static,
    {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn with_args<F>(mut self, builder: F) -> Self
    where
        F: Fn(&Arguments, &ToolContext) -> Option<Arguments> + Send + Sync + 'static,
    {
        self.args = Some(Arc::new(builder));
        self
    }

    pub fn merge_with<F>(mut self, merger: F) -> Self
    where
        F: Fn(&Arguments, &ToolResult) -> Result<MergeOutcome, DomainError> + Send + Sync + 'static,
    {
        self.merge_result = Some(Arc::new(merger));
        self
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn applies(&self, arguments: &Arguments, context: &ToolContext) -> bool {
        self.condition
            .as_ref()
            .is_none_or(|condition| condition(arguments, context))
    }

    /// Arguments for the dependency call; empty when no builder is set or
    /// the builder declines.
    pub fn build_arguments(&self, arguments: &Arguments, context: &ToolContext) -> Arguments {
        self.args
            .as_ref()
            .and_then(|builder| builder(arguments, context))
            .unwrap_or_default()
    }

    pub fn merge(
        &self,
        arguments: &Arguments,
        result: &ToolResult,
    ) -> Result<MergeOutcome, DomainError> {
        match &self.merge_result {
            Some(merger) => merger(arguments, result),
            None => Ok(MergeOutcome::Merged(arguments.clone())),
        }
    }
}

impl std::fmt::Debug for ToolDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDependency")
            .field("tool_name", &self.tool_name)
            .field("condition", &self.condition.is_some())
            .field("args", &self.args.is_some())
            .field("merge_result", &self.merge_result.is_some())
            .finish()
    }
}
