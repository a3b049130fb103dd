//! Closure-backed tool

use async_trait::async_trait;
use conductor_domain::dependency::ToolDependency;
use conductor_domain::tool::{
    Arguments, DependencyProvider, MetadataProvider, Tool, ToolContext, ToolFailure, ToolMetadata,
    ToolResult, ToolSchema,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

type Handler = Arc<dyn Fn(&Arguments, &ToolContext) -> Result<Value, ToolFailure> + Send + Sync>;

/// A tool whose body is a closure.
///
/// The closure returns the success payload; an `Err` is an uncaught failure
/// and is wrapped by the executor. Metadata and dependencies are exposed
/// through the capability probes only when set.
///
/// ```ignore
/// let teams = FunctionTool::new("core.teams.GET", "List teams", |_, _| {
///     Ok(json!({"teams": [{"id": 7, "name": "Acme"}]}))
/// })
/// .with_metadata(ToolMetadata::query());
/// ```
#[derive(Clone)]
pub struct FunctionTool {
    name: String,
    description: String,
    schema: ToolSchema,
    metadata: Option<ToolMetadata>,
    dependencies: Vec<ToolDependency>,
    handler: Handler,
}

impl FunctionTool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Arguments, &ToolContext) -> Result<Value, ToolFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            schema: ToolSchema::new(),
            metadata: None,
            dependencies: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    pub fn with_schema(mut self, schema: ToolSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_metadata(mut self, metadata: ToolMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn with_dependency(mut self, dependency: ToolDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

impl fmt::Debug for FunctionTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTool")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("metadata", &self.metadata)
            .field("dependencies", &self.dependencies.len())
            .finish()
    }
}

#[async_trait]
impl Tool for FunctionTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(
        &self,
        arguments: &Arguments,
        context: &ToolContext,
    ) -> Result<ToolResult, ToolFailure> {
        let data = (self.handler)(arguments, context)?;
        Ok(ToolResult::success(self.name.clone(), data))
    }

    fn metadata_provider(&self) -> Option<&dyn MetadataProvider> {
        self.metadata.as_ref().map(|_| self as &dyn MetadataProvider)
    }

    fn dependency_provider(&self) -> Option<&dyn DependencyProvider> {
        if self.dependencies.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl MetadataProvider for FunctionTool {
    fn metadata(&self) -> ToolMetadata {
        self.metadata.clone().unwrap_or_else(ToolMetadata::utility)
    }
}

impl DependencyProvider for FunctionTool {
    fn dependencies(&self) -> Vec<ToolDependency> {
        self.dependencies.clone()
    }
}
