//! Tool domain traits
//!
//! [`Tool`] is the contract every invocable tool satisfies. Metadata and
//! dependency declarations are optional capabilities: a tool opts in by
//! implementing [`MetadataProvider`] / [`DependencyProvider`] and returning
//! itself from the matching probe method. Callers always probe; they never
//! assume a capability is present.

use async_trait::async_trait;

use super::entities::{Arguments, ToolContext, ToolMetadata, ToolSchema};
use super::value_objects::{FieldViolation, ToolFailure, ToolResult};
use crate::dependency::ToolDependency;

/// A named, schema-described invocable unit.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Globally unique, dot-segmented name (e.g. `core.teams.GET`)
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> &ToolSchema;

    /// Run the tool body.
    ///
    /// Expected outcomes, including domain-level errors, are returned as a
    /// [`ToolResult`]. `Err` is reserved for failures the tool could not
    /// handle; the executor classifies and wraps them.
    async fn execute(
        &self,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> Result<ToolResult, ToolFailure>;

    /// Probe for the metadata capability
    fn metadata_provider(&self) -> Option<&dyn MetadataProvider> {
        None
    }

    /// Probe for the dependency capability
    fn dependency_provider(&self) -> Option<&dyn DependencyProvider> {
        None
    }
}

/// Optional capability: self-described metadata.
pub trait MetadataProvider: Send + Sync {
    fn metadata(&self) -> ToolMetadata;
}

/// Optional capability: other tools that must run before this one.
pub trait DependencyProvider: Send + Sync {
    /// Dependencies in the order they should be processed
    fn dependencies(&self) -> Vec<ToolDependency>;
}

/// Validator for tool arguments
///
/// This is a pure domain trait that validates arguments against a
/// [`ToolSchema`] without any I/O operations.
pub trait ToolValidator: Send + Sync {
    /// Validate arguments, reporting every violated field.
    fn validate(&self, arguments: &Arguments, schema: &ToolSchema) -> Result<(), Vec<FieldViolation>>;
}

/// Default implementation of ToolValidator
///
/// Required names must be present and non-null; present properties must
/// match their declared primitive type. Undeclared arguments are allowed.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, arguments: &Arguments, schema: &ToolSchema) -> Result<(), Vec<FieldViolation>> {
        let mut violations = Vec::new();

        for name in &schema.required {
            match arguments.get(name) {
                None | Some(serde_json::Value::Null) => {
                    violations.push(FieldViolation::missing(name));
                }
                Some(_) => {}
            }
        }

        for (name, value) in arguments {
            if value.is_null() {
                continue;
            }
            if let Some(spec) = schema.properties.get(name)
                && !spec.property_type.matches(value)
            {
                violations.push(FieldViolation::wrong_type(name, spec.property_type.as_str()));
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}
