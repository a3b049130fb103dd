//! Echo tool: returns the given message unchanged

use async_trait::async_trait;
use conductor_domain::tool::{
    Arguments, MetadataProvider, PropertyType, Tool, ToolContext, ToolFailure, ToolMetadata,
    ToolResult, ToolSchema,
};
use serde_json::json;

/// Tool name constant
pub const ECHO: &str = "echo";

/// Returns `{"echo": message}`.
#[derive(Debug, Clone)]
pub struct EchoTool {
    schema: ToolSchema,
}

impl EchoTool {
    pub fn new() -> Self {
        Self {
            schema: ToolSchema::new().required_property(
                "message",
                PropertyType::String,
                "Text to send back",
            ),
        }
    }
}

impl Default for EchoTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        ECHO
    }

    fn description(&self) -> &str {
        "Return the given message unchanged"
    }

    fn schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(
        &self,
        arguments: &Arguments,
        _context: &ToolContext,
    ) -> Result<ToolResult, ToolFailure> {
        let message = arguments
            .get("message")
            .and_then(|value| value.as_str())
            .ok_or_else(|| ToolFailure::InvalidInput("message must be a string".to_string()))?;
        Ok(ToolResult::success(ECHO, json!({ "echo": message })))
    }

    fn metadata_provider(&self) -> Option<&dyn MetadataProvider> {
        Some(self)
    }
}

impl MetadataProvider for EchoTool {
    fn metadata(&self) -> ToolMetadata {
        ToolMetadata::utility().with_tag("diagnostics")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo() {
        let arguments = json!({"message": "hi"}).as_object().cloned().unwrap();
        let result = EchoTool::new()
            .execute(&arguments, &ToolContext::new())
            .await
            .unwrap();
        assert!(result.is_success());
        assert_eq!(result.data(), Some(&json!({"echo": "hi"})));
    }

    #[tokio::test]
    async fn test_non_string_message_is_invalid_input() {
        let arguments = json!({"message": 3}).as_object().cloned().unwrap();
        let err = EchoTool::new()
            .execute(&arguments, &ToolContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ToolFailure::InvalidInput(_)));
    }

    #[test]
    fn test_schema_and_metadata() {
        let tool = EchoTool::new();
        assert!(tool.schema().is_required("message"));
        let metadata = tool.metadata_provider().map(|p| p.metadata()).unwrap();
        assert!(metadata.read_only);
        assert!(metadata.has_tag("diagnostics"));
    }
}
