//! Resolve Dependency use case.
//!
//! Interprets a [`DependencyDeclaration`] generically: when required
//! arguments are missing, it runs the declared resolver tool through the
//! executor and maps the selected candidate back into the arguments.
//!
//! The result is either a fully merged argument set or `None`, which means
//! a human has to choose before the call can continue.

use crate::ports::tool_executor::ToolExecutorPort;
use conductor_domain::core::error::DomainError;
use conductor_domain::dependency::{DependencyDeclaration, MergeOutcome};
use conductor_domain::tool::{Arguments, ToolContext};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case filling missing arguments from a resolver tool.
pub struct DependencyResolver<T: ToolExecutorPort + ?Sized> {
    executor: Arc<T>,
}

impl<T: ToolExecutorPort + ?Sized> DependencyResolver<T> {
    pub fn new(executor: Arc<T>) -> Self {
        Self { executor }
    }

    /// Resolve `declaration` against `arguments`.
    ///
    /// - `Ok(Some(args))`: nothing was missing, nothing could be done
    ///   (no resolver, resolver failed), or every required field was filled
    /// - `Ok(None)`: the selection is ambiguous or incomplete
    /// - `Err(_)`: the `fail` strategy saw zero or several candidates
    pub async fn resolve(
        &self,
        declaration: &DependencyDeclaration,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> Result<Option<Arguments>, DomainError> {
        let missing = declaration.missing_fields(arguments);
        if missing.is_empty() {
            return Ok(Some(arguments.clone()));
        }

        let Some(resolver) = declaration.resolver_tool.as_deref() else {
            warn!(missing = ?missing, "Missing arguments but no resolver tool declared");
            return Ok(Some(arguments.clone()));
        };

        debug!(resolver = %resolver, missing = ?missing, "Resolving missing arguments");
        let result = self
            .executor
            .execute(resolver, &Arguments::new(), context)
            .await;
        if !result.is_success() {
            warn!(
                resolver = %resolver,
                code = result.error_code().unwrap_or_default(),
                "Resolver tool failed; leaving arguments unchanged"
            );
            return Ok(Some(arguments.clone()));
        }

        match declaration.merge_result(arguments, &result)? {
            MergeOutcome::Merged(merged) => {
                info!(resolver = %resolver, fields = ?missing, "Resolved missing arguments");
                Ok(Some(merged))
            }
            MergeOutcome::NeedsUserInput => Ok(None),
        }
    }
}
