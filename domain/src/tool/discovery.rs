//! Tool Discovery: metadata-driven filtering and search over the registry.
//!
//! Discovery never executes anything. Tools that do not implement
//! [`MetadataProvider`](super::traits::MetadataProvider) get metadata
//! inferred from their name (see [`infer_metadata`]).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::entities::{RiskLevel, ToolCategory, ToolMetadata};
use super::naming::{infer_metadata, module_prefix};
use super::registry::ToolRegistry;
use super::traits::Tool;

/// Filter criteria. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryCriteria {
    /// Exact category label
    pub category: Option<String>,
    /// Tags the tool must carry (all of them)
    pub tags: Vec<String>,
    pub read_only: Option<bool>,
    /// Text before the first `.` of the name
    pub module: Option<String>,
    /// Case-insensitive free text over name and description
    pub search: Option<String>,
}

impl DiscoveryCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = Some(read_only);
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    fn matches(&self, tool: &dyn Tool, metadata: &ToolMetadata) -> bool {
        if let Some(category) = &self.category
            && metadata.category.as_str() != category
        {
            return false;
        }
        if !self.tags.iter().all(|tag| metadata.has_tag(tag)) {
            return false;
        }
        if let Some(read_only) = self.read_only
            && metadata.read_only != read_only
        {
            return false;
        }
        if let Some(module) = &self.module
            && module_prefix(tool.name()) != module
        {
            return false;
        }
        if let Some(text) = &self.search {
            let needle = text.to_lowercase();
            let haystack = format!("{} {}", tool.name(), tool.description()).to_lowercase();
            if !haystack.contains(&needle) {
                return false;
            }
        }
        true
    }
}

/// Compact description of a tool for listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSummary {
    pub name: String,
    pub description: String,
    pub module: String,
    pub category: ToolCategory,
    pub tags: Vec<String>,
    pub read_only: bool,
    pub risk_level: RiskLevel,
}

impl ToolSummary {
    fn from_tool(tool: &dyn Tool, metadata: ToolMetadata) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description().to_string(),
            module: module_prefix(tool.name()).to_string(),
            category: metadata.category,
            tags: metadata.tags,
            read_only: metadata.read_only,
            risk_level: metadata.risk_level,
        }
    }
}

/// Read-only search over a [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct ToolDiscovery {
    registry: Arc<ToolRegistry>,
}

impl ToolDiscovery {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// Metadata for a tool: self-described when available, else inferred.
    pub fn tool_metadata(tool: &dyn Tool) -> ToolMetadata {
        match tool.metadata_provider() {
            Some(provider) => provider.metadata(),
            None => infer_metadata(tool.name()),
        }
    }

    /// Summaries of matching tools, sorted by name.
    pub fn discover(&self, criteria: &DiscoveryCriteria) -> Vec<ToolSummary> {
        self.registry
            .all()
            .into_values()
            .filter_map(|tool| {
                let metadata = Self::tool_metadata(tool.as_ref());
                criteria
                    .matches(tool.as_ref(), &metadata)
                    .then(|| ToolSummary::from_tool(tool.as_ref(), metadata))
            })
            .collect()
    }

    /// Matching tools themselves, sorted by name.
    pub fn find_by_criteria(&self, criteria: &DiscoveryCriteria) -> Vec<Arc<dyn Tool>> {
        self.registry
            .all()
            .into_values()
            .filter(|tool| criteria.matches(tool.as_ref(), &Self::tool_metadata(tool.as_ref())))
            .collect()
    }

    /// Tool count per category label
    pub fn categories(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for tool in self.registry.all().into_values() {
            let metadata = Self::tool_metadata(tool.as_ref());
            *counts.entry(metadata.category.as_str().to_string()).or_insert(0) += 1;
        }
        counts
    }

    /// Summaries of the registered tools a tool lists as related.
    pub fn related(&self, name: &str) -> Vec<ToolSummary> {
        let Some(tool) = self.registry.get(name) else {
            return Vec::new();
        };
        Self::tool_metadata(tool.as_ref())
            .related_tools
            .iter()
            .filter_map(|related| self.registry.get(related))
            .map(|related| {
                let metadata = Self::tool_metadata(related.as_ref());
                ToolSummary::from_tool(related.as_ref(), metadata)
            })
            .collect()
    }
}
