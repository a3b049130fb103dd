//! Tool Registry
//!
//! Name → tool lookup shared by discovery, planning, resolution and
//! execution. One registry is built at process start and injected wherever
//! it is needed.
//!
//! # Legacy aliases
//!
//! When a name is not registered directly, the registry tries the names
//! produced by [`legacy_alias_candidates`] (`core.teams.list` ↔
//! `core.teams.GET`, ...). A successful alias resolution is cached so the
//! next lookup of the same name is a single map hit.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use super::naming::legacy_alias_candidates;
use super::traits::Tool;

/// Registry of invocable tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<HashMap<String, Arc<dyn Tool>>>,
    /// Alias → canonical name, filled lazily on lookup
    aliases: RwLock<HashMap<String, String>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool (builder pattern)
    pub fn with_tool(self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    /// Register a tool. Last write wins; an overwrite is logged.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();

        // A direct registration shadows any alias cached under the same name
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name);

        let previous = self
            .tools
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.clone(), tool);

        if previous.is_some() {
            tracing::warn!(tool = %name, "Tool re-registered; previous registration overwritten");
        } else {
            tracing::debug!(tool = %name, "Registered tool");
        }
    }

    /// Look up a tool by name, falling back to legacy aliases.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        let canonical = self.resolve_name(name)?;
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&canonical)
            .cloned()
    }

    pub fn has(&self, name: &str) -> bool {
        self.resolve_name(name).is_some()
    }

    /// Canonical registered name for `name` (itself, or the alias target).
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        let tools = self.tools.read().unwrap_or_else(PoisonError::into_inner);
        if tools.contains_key(name) {
            return Some(name.to_string());
        }

        if let Some(target) = self
            .aliases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            && tools.contains_key(target)
        {
            return Some(target.clone());
        }

        let target = legacy_alias_candidates(name)
            .into_iter()
            .find(|candidate| tools.contains_key(candidate))?;
        drop(tools);

        tracing::debug!(alias = %name, tool = %target, "Resolved legacy tool alias");
        self.aliases
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), target.clone());
        Some(target)
    }

    /// Snapshot of every registered tool, keyed by canonical name.
    pub fn all(&self) -> BTreeMap<String, Arc<dyn Tool>> {
        self.tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, tool)| (name.clone(), Arc::clone(tool)))
            .collect()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tools
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of alias resolutions cached so far
    pub fn cached_alias_count(&self) -> usize {
        self.aliases.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
