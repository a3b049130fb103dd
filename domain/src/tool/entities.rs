//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arguments passed to a tool: a JSON object keyed by field name.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only queries
    #[default]
    Low,
    /// Reversible writes
    Medium,
    /// Destructive or externally visible operations
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    pub fn requires_confirmation(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Functional category of a tool.
///
/// `Query`, `Action` and `Utility` are the categories inferred from tool
/// names; tools that describe themselves may use any other label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToolCategory {
    Query,
    Action,
    Utility,
    Custom(String),
}

impl ToolCategory {
    pub fn as_str(&self) -> &str {
        match self {
            ToolCategory::Query => "query",
            ToolCategory::Action => "action",
            ToolCategory::Utility => "utility",
            ToolCategory::Custom(label) => label,
        }
    }
}

impl From<String> for ToolCategory {
    fn from(value: String) -> Self {
        match value.as_str() {
            "query" => ToolCategory::Query,
            "action" => ToolCategory::Action,
            "utility" => ToolCategory::Utility,
            _ => ToolCategory::Custom(value),
        }
    }
}

impl From<&str> for ToolCategory {
    fn from(value: &str) -> Self {
        ToolCategory::from(value.to_string())
    }
}

impl From<ToolCategory> for String {
    fn from(value: ToolCategory) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive metadata a tool may expose through
/// [`MetadataProvider`](super::traits::MetadataProvider).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub category: ToolCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub read_only: bool,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub idempotent: bool,
    #[serde(default)]
    pub confirmation_required: bool,
    #[serde(default)]
    pub related_tools: Vec<String>,
}

impl ToolMetadata {
    /// Metadata for a side-effect free query tool.
    pub fn query() -> Self {
        Self {
            category: ToolCategory::Query,
            tags: Vec::new(),
            read_only: true,
            risk_level: RiskLevel::Low,
            idempotent: false,
            confirmation_required: false,
            related_tools: Vec::new(),
        }
    }

    /// Metadata for a state-changing tool.
    pub fn action() -> Self {
        Self {
            category: ToolCategory::Action,
            read_only: false,
            risk_level: RiskLevel::Medium,
            ..Self::query()
        }
    }

    /// Metadata for a tool that fits neither convention. Read-only by default.
    pub fn utility() -> Self {
        Self {
            category: ToolCategory::Utility,
            ..Self::query()
        }
    }

    pub fn with_category(mut self, category: impl Into<ToolCategory>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self.confirmation_required |= risk_level.requires_confirmation();
        self
    }

    pub fn idempotent(mut self) -> Self {
        self.idempotent = true;
        self
    }

    pub fn with_related_tool(mut self, name: impl Into<String>) -> Self {
        self.related_tools.push(name.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Primitive type declared for a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// Any type name the validator does not know; never rejected.
    #[serde(other)]
    Unknown,
}

impl PropertyType {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Number => "number",
            PropertyType::Boolean => "boolean",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
            PropertyType::Unknown => "unknown",
        }
    }

    /// Whether `value` satisfies this declared type.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            PropertyType::String => value.is_string(),
            PropertyType::Integer => value.is_i64() || value.is_u64(),
            PropertyType::Number => value.is_number(),
            PropertyType::Boolean => value.is_boolean(),
            PropertyType::Array => value.is_array(),
            PropertyType::Object => value.is_object(),
            PropertyType::Unknown => true,
        }
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single property in a [`ToolSchema`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// Structural descriptor of a tool's arguments: required names plus
/// per-field primitive types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySpec>,
}

impl ToolSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property (builder pattern)
    pub fn property(
        mut self,
        name: impl Into<String>,
        property_type: PropertyType,
        description: impl Into<String>,
    ) -> Self {
        self.properties.insert(
            name.into(),
            PropertySpec {
                property_type,
                description: description.into(),
            },
        );
        self
    }

    /// Declare a required property (builder pattern)
    pub fn required_property(
        mut self,
        name: impl Into<String>,
        property_type: PropertyType,
        description: impl Into<String>,
    ) -> Self {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name.clone());
        }
        self.property(name, property_type, description)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Render as a JSON Schema object (`{"type": "object", ...}`).
    pub fn to_json_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "required": self.required,
            "properties": self.properties,
        })
    }
}

/// Caller identity and session scope passed into every tool call.
///
/// Built by the surrounding auth/session layer; the runtime only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolContext {
    /// Authenticated principal (user id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    /// Active tenant / team
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Correlation id for logs and telemetry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ToolContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_principal(mut self, principal_id: impl Into<String>) -> Self {
        self.principal_id = Some(principal_id.into());
        self
    }

    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Identity used to scope per-caller counters: principal, then team.
    pub fn scope_key(&self) -> &str {
        self.principal_id
            .as_deref()
            .or(self.team_id.as_deref())
            .unwrap_or("anonymous")
    }
}
