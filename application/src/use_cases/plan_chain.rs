//! Plan Chain use case.
//!
//! Builds the dependency graph reachable from a requested tool and a
//! dependencies-first execution order. Nothing is executed: conditions and
//! argument builders are evaluated, tool bodies are not. A callback that
//! panics becomes a plan warning and its dependency is left out.

use crate::use_cases::shared::contain_panic;
use conductor_domain::chain::ChainPlan;
use conductor_domain::tool::{Arguments, ToolContext, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

/// Use case producing a [`ChainPlan`].
#[derive(Debug, Clone)]
pub struct ChainPlanner {
    registry: Arc<ToolRegistry>,
}

impl ChainPlanner {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Plan the chain for `tool_name` called with `arguments`.
    ///
    /// Unregistered tools land in `missing`. A tool reappearing in its own
    /// ancestry is reported as a cycle warning and not expanded again, so
    /// planning always terminates.
    pub fn plan(&self, tool_name: &str, arguments: &Arguments, context: &ToolContext) -> ChainPlan {
        let main_tool = self
            .registry
            .resolve_name(tool_name)
            .unwrap_or_else(|| tool_name.to_string());
        let mut plan = ChainPlan::new(&main_tool);
        let mut path = Vec::new();

        self.visit(&main_tool, arguments, context, &mut path, &mut plan);
        plan.compute_order();

        debug!(
            tool = %plan.main_tool,
            order = ?plan.order,
            missing = plan.missing.len(),
            warnings = plan.warnings.len(),
            "Chain planned"
        );
        plan
    }

    fn visit(
        &self,
        name: &str,
        arguments: &Arguments,
        context: &ToolContext,
        path: &mut Vec<String>,
        plan: &mut ChainPlan,
    ) {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = %name, "Planned tool is not registered");
            plan.record_missing(name);
            return;
        };
        let canonical = tool.name().to_string();

        if path.contains(&canonical) {
            let cycle = format!("Cycle detected: {} -> {}", path.join(" -> "), canonical);
            warn!(tool = %canonical, "{}", cycle);
            plan.warn(cycle);
            return;
        }
        if plan.tools.contains_key(&canonical) {
            return;
        }

        plan.add_tool(&canonical, arguments.clone());
        let Some(provider) = tool.dependency_provider() else {
            return;
        };

        path.push(canonical.clone());
        for dependency in provider.dependencies() {
            let evaluated = contain_panic(|| {
                dependency
                    .applies(arguments, context)
                    .then(|| dependency.build_arguments(arguments, context))
            });
            let dependency_arguments = match evaluated {
                Ok(Some(built)) => built,
                Ok(None) => {
                    debug!(tool = %canonical, dependency = %dependency.tool_name(), "Dependency condition not met");
                    continue;
                }
                Err(panic) => {
                    let warning = format!(
                        "Dependency '{}' of '{}' panicked while planning: {}",
                        dependency.tool_name(),
                        canonical,
                        panic
                    );
                    warn!(tool = %canonical, "{}", warning);
                    plan.warn(warning);
                    continue;
                }
            };
            let dependency_name = self
                .registry
                .resolve_name(dependency.tool_name())
                .unwrap_or_else(|| dependency.tool_name().to_string());

            plan.add_edge(&canonical, dependency_name.clone());
            self.visit(&dependency_name, &dependency_arguments, context, path, plan);
        }
        path.pop();
    }
}
