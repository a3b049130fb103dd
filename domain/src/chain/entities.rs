//! Chain plan entities

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::tool::entities::Arguments;

/// One node of a [`ChainPlan`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannedTool {
    /// Arguments the tool would be called with
    pub arguments: Arguments,
    /// Direct dependencies, in declared order
    pub dependencies: Vec<String>,
}

/// Dependency graph and execution order computed for a requested tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainPlan {
    pub main_tool: String,
    pub tools: BTreeMap<String, PlannedTool>,
    /// Dependencies before dependents; the main tool comes last
    pub order: Vec<String>,
    /// Referenced tools that are not registered
    pub missing: Vec<String>,
    pub warnings: Vec<String>,
}

impl ChainPlan {
    pub fn new(main_tool: impl Into<String>) -> Self {
        Self {
            main_tool: main_tool.into(),
            ..Self::default()
        }
    }

    pub fn add_tool(&mut self, name: impl Into<String>, arguments: Arguments) {
        self.tools.entry(name.into()).or_insert(PlannedTool {
            arguments,
            dependencies: Vec::new(),
        });
    }

    pub fn add_edge(&mut self, from: &str, to: impl Into<String>) {
        let to = to.into();
        if let Some(node) = self.tools.get_mut(from)
            && !node.dependencies.contains(&to)
        {
            node.dependencies.push(to);
        }
    }

    pub fn record_missing(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.missing.contains(&name) {
            self.missing.push(name);
        }
    }

    pub fn warn(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Direct dependencies of a planned tool
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.tools
            .get(name)
            .map(|node| node.dependencies.as_slice())
            .unwrap_or(&[])
    }

    /// No missing tools and no warnings
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.warnings.is_empty()
    }

    /// Compute [`order`](Self::order) by depth-first post-order from the
    /// main tool, then from any node not reached from it.
    ///
    /// A node already on the walk is not entered again, so cycles still
    /// terminate; their members are emitted without a guaranteed relative
    /// position. Missing tools never appear in the order.
    pub fn compute_order(&mut self) {
        let mut visited = HashSet::new();
        let mut order = Vec::with_capacity(self.tools.len());

        let mut roots = vec![self.main_tool.clone()];
        roots.extend(self.tools.keys().cloned());
        for root in roots {
            self.visit(&root, &mut visited, &mut order);
        }
        self.order = order;
    }

    fn visit(&self, name: &str, visited: &mut HashSet<String>, order: &mut Vec<String>) {
        let Some(node) = self.tools.get(name) else {
            return;
        };
        if !visited.insert(name.to_string()) {
            return;
        }
        for dependency in &node.dependencies {
            self.visit(dependency, visited, order);
        }
        order.push(name.to_string());
    }
}
