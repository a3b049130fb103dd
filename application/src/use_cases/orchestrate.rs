//! Orchestrate use case.
//!
//! The façade callers use to run a tool together with its declared
//! dependencies:
//!
//! ```text
//! Planning? ──▶ ResolvingDependencies ──┬──▶ AwaitingUserInput (paused result)
//!                 (sequential, executor) └──▶ ExecutingMain ──▶ Done | Failed
//! ```
//!
//! Dependencies run one level deep through the executor, strictly in
//! declared order, because later argument builders may read values merged
//! from earlier ones. A failed dependency is logged and skipped; the main
//! tool's own validation reports anything that was really required.
//! Dependency callbacks are tool-authored code: a panicking condition or
//! argument builder skips its dependency, a panicking merge fails the call.

use crate::config::OrchestratorConfig;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::use_cases::plan_chain::ChainPlanner;
use crate::use_cases::shared::contain_panic;
use conductor_domain::dependency::{MergeOutcome, ToolDependency};
use conductor_domain::tool::{Arguments, ToolContext, ToolError, ToolResult};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phases of one orchestrated call, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationPhase {
    Planning,
    ResolvingDependencies,
    AwaitingUserInput,
    ExecutingMain,
    Done,
    Failed,
}

impl OrchestrationPhase {
    pub fn as_str(&self) -> &str {
        match self {
            OrchestrationPhase::Planning => "planning",
            OrchestrationPhase::ResolvingDependencies => "resolving_dependencies",
            OrchestrationPhase::AwaitingUserInput => "awaiting_user_input",
            OrchestrationPhase::ExecutingMain => "executing_main",
            OrchestrationPhase::Done => "done",
            OrchestrationPhase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for OrchestrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of the dependency phase
enum DependencyPhase {
    Ready(Arguments),
    Paused(ToolResult),
    Failed(ToolResult),
}

/// Use case running a tool after its dependencies.
pub struct ToolOrchestrator<T: ToolExecutorPort + ?Sized> {
    executor: Arc<T>,
    planner: ChainPlanner,
    config: OrchestratorConfig,
}

impl<T: ToolExecutorPort + ?Sized> ToolOrchestrator<T> {
    pub fn new(executor: Arc<T>) -> Self {
        let planner = ChainPlanner::new(executor.registry().clone());
        Self {
            executor,
            planner,
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn planner(&self) -> &ChainPlanner {
        &self.planner
    }

    /// [`execute_with_dependencies`](Self::execute_with_dependencies) with
    /// the configured depth budget and planning flag.
    pub async fn execute(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> ToolResult {
        self.execute_with_dependencies(
            tool_name,
            arguments,
            context,
            self.config.default_max_depth,
            self.config.plan_first,
        )
        .await
    }

    /// Run a call made from inside a tool that was itself started with
    /// `depth` levels of budget left.
    ///
    /// The orchestrator does not track nesting on its own: the calling tool
    /// carries its depth and hands it in here, which spends one level.
    pub async fn execute_nested(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
        depth: u32,
    ) -> ToolResult {
        self.execute_with_dependencies(
            tool_name,
            arguments,
            context,
            depth.saturating_sub(1),
            self.config.plan_first,
        )
        .await
    }

    /// Run `tool_name` after its declared dependencies.
    ///
    /// A `max_depth` of zero is refused with `MAX_DEPTH_EXCEEDED` before
    /// anything runs. Callers track the depth themselves; nested calls go
    /// through [`execute_nested`](Self::execute_nested).
    pub async fn execute_with_dependencies(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
        max_depth: u32,
        plan_first: bool,
    ) -> ToolResult {
        if max_depth == 0 {
            warn!(tool = %tool_name, phase = %OrchestrationPhase::Failed, "Maximum depth exceeded");
            return ToolResult::failure(tool_name, ToolError::max_depth_exceeded(tool_name));
        }

        if plan_first {
            self.log_plan(tool_name, arguments, context);
        }

        let arguments = match self.run_dependencies(tool_name, arguments, context).await {
            DependencyPhase::Ready(arguments) => arguments,
            DependencyPhase::Paused(result) | DependencyPhase::Failed(result) => return result,
        };

        debug!(tool = %tool_name, phase = %OrchestrationPhase::ExecutingMain, "Executing main tool");
        let result = self.executor.execute(tool_name, &arguments, context).await;
        let phase = if result.is_success() {
            OrchestrationPhase::Done
        } else {
            OrchestrationPhase::Failed
        };
        debug!(tool = %tool_name, phase = %phase, "Orchestration finished");
        result
    }

    /// Advisory only: problems are logged, never fatal.
    fn log_plan(&self, tool_name: &str, arguments: &Arguments, context: &ToolContext) {
        let plan = self.planner.plan(tool_name, arguments, context);
        debug!(tool = %tool_name, phase = %OrchestrationPhase::Planning, order = ?plan.order, "Chain planned");
        for missing in &plan.missing {
            warn!(tool = %tool_name, missing = %missing, "Plan references an unregistered tool");
        }
        for warning in &plan.warnings {
            warn!(tool = %tool_name, "{}", warning);
        }
    }

    async fn run_dependencies(
        &self,
        tool_name: &str,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> DependencyPhase {
        let mut current = arguments.clone();
        let dependencies = match self.executor.registry().get(tool_name) {
            Some(tool) => tool
                .dependency_provider()
                .map(|provider| provider.dependencies())
                .unwrap_or_default(),
            None => Vec::new(),
        };

        for dependency in dependencies {
            let dependency_name = dependency.tool_name();
            match contain_panic(|| dependency.applies(&current, context)) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(tool = %tool_name, dependency = %dependency_name, "Dependency condition not met");
                    continue;
                }
                Err(panic) => {
                    warn!(
                        tool = %tool_name,
                        dependency = %dependency_name,
                        panic = %panic,
                        "Dependency condition panicked; skipping"
                    );
                    continue;
                }
            }

            debug!(
                tool = %tool_name,
                dependency = %dependency_name,
                phase = %OrchestrationPhase::ResolvingDependencies,
                "Executing dependency"
            );
            let built = contain_panic(|| dependency.build_arguments(&current, context));
            let dependency_arguments = match built {
                Ok(built) => built,
                Err(panic) => {
                    warn!(
                        tool = %tool_name,
                        dependency = %dependency_name,
                        panic = %panic,
                        "Dependency argument builder panicked; skipping"
                    );
                    continue;
                }
            };
            let result = self
                .executor
                .execute(dependency_name, &dependency_arguments, context)
                .await;
            if !result.is_success() {
                warn!(
                    tool = %tool_name,
                    dependency = %dependency_name,
                    code = result.error_code().unwrap_or_default(),
                    "Dependency failed; continuing with the main tool"
                );
                continue;
            }

            let merged = contain_panic(|| dependency.merge(&current, &result))
                .map_err(|panic| format!("merging '{}' panicked: {}", dependency_name, panic))
                .and_then(|merged| merged.map_err(|e| e.to_string()));
            match merged {
                Ok(MergeOutcome::Merged(merged)) => current = merged,
                Ok(MergeOutcome::NeedsUserInput) => {
                    info!(
                        tool = %tool_name,
                        dependency = %dependency_name,
                        phase = %OrchestrationPhase::AwaitingUserInput,
                        "Dependency needs user input"
                    );
                    return DependencyPhase::Paused(awaiting_user_input(
                        tool_name,
                        &dependency,
                        &result,
                        &current,
                    ));
                }
                Err(e) => {
                    warn!(
                        tool = %tool_name,
                        dependency = %dependency_name,
                        phase = %OrchestrationPhase::Failed,
                        error = %e,
                        "Merging dependency result failed"
                    );
                    return DependencyPhase::Failed(ToolResult::failure(
                        tool_name,
                        ToolError::execution(e),
                    ));
                }
            }
        }

        DependencyPhase::Ready(current)
    }
}

/// Successful result describing the choice a human has to make.
fn awaiting_user_input(
    tool_name: &str,
    dependency: &ToolDependency,
    result: &ToolResult,
    arguments: &Arguments,
) -> ToolResult {
    ToolResult::success(
        tool_name,
        json!({
            "requires_user_input": true,
            "dependency": dependency.tool_name(),
            "message": format!(
                "'{}' needs a choice from the results of '{}' before it can run",
                tool_name,
                dependency.tool_name()
            ),
            "data": result.data().cloned().unwrap_or(Value::Null),
            "next_tool": tool_name,
            "next_tool_args": arguments,
        }),
    )
}
