//! Console output for CLI commands

use colored::Colorize;
use conductor_domain::chain::ChainPlan;
use conductor_domain::tool::{Tool, ToolDiscovery, ToolResult, ToolSummary};
use std::collections::BTreeMap;

/// Formats tools, plans and results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// One line per tool, followed by category counts
    pub fn format_tool_list(tools: &[ToolSummary], categories: &BTreeMap<String, usize>) -> String {
        if tools.is_empty() {
            return format!("{}\n", "No tools match.".dimmed());
        }

        let width = tools.iter().map(|t| t.name.len()).max().unwrap_or(0);
        let mut output = Self::section_header("Tools");
        for tool in tools {
            let access = if tool.read_only {
                "read".green()
            } else {
                "write".yellow()
            };
            output.push_str(&format!(
                "  {:width$}  {:5}  {:8}  {}\n",
                tool.name.bold(),
                access,
                tool.category.as_str(),
                tool.description,
                width = width
            ));
        }

        let counts: Vec<String> = categories
            .iter()
            .map(|(category, count)| format!("{}={}", category, count))
            .collect();
        output.push_str(&format!("\n{} {}\n", "Categories:".dimmed(), counts.join(", ")));
        output
    }

    pub fn format_tool_details(tool: &dyn Tool, related: &[ToolSummary]) -> String {
        let metadata = ToolDiscovery::tool_metadata(tool);
        let mut output = Self::header(tool.name());
        output.push_str(&format!("\n{}\n\n", tool.description()));

        output.push_str(&format!("{} {}\n", "Category:".cyan().bold(), metadata.category));
        output.push_str(&format!("{} {}\n", "Read-only:".cyan().bold(), metadata.read_only));
        output.push_str(&format!("{} {}\n", "Idempotent:".cyan().bold(), metadata.idempotent));
        output.push_str(&format!("{} {}\n", "Risk:".cyan().bold(), metadata.risk_level.as_str()));
        if !metadata.tags.is_empty() {
            output.push_str(&format!("{} {}\n", "Tags:".cyan().bold(), metadata.tags.join(", ")));
        }

        let schema = tool.schema();
        if !schema.properties.is_empty() {
            output.push_str(&Self::section_header("Arguments"));
            for (name, spec) in &schema.properties {
                let required = if schema.is_required(name) { "required" } else { "optional" };
                output.push_str(&format!(
                    "  {} ({}, {}) {}\n",
                    name.bold(),
                    spec.property_type.as_str(),
                    required,
                    spec.description
                ));
            }
        }

        if let Some(provider) = tool.dependency_provider() {
            output.push_str(&Self::section_header("Dependencies"));
            for dependency in provider.dependencies() {
                output.push_str(&format!("  * {}\n", dependency.tool_name()));
            }
        }

        if !related.is_empty() {
            output.push_str(&Self::section_header("Related"));
            for summary in related {
                output.push_str(&format!("  * {}  {}\n", summary.name, summary.description.dimmed()));
            }
        }

        output
    }

    pub fn format_plan(plan: &ChainPlan) -> String {
        let mut output = Self::header(&format!("Plan: {}", plan.main_tool));
        output.push('\n');

        if plan.order.is_empty() {
            output.push_str(&format!("{}\n", "Nothing to run.".dimmed()));
        }
        for (step, name) in plan.order.iter().enumerate() {
            output.push_str(&format!("{:>3}. {}\n", step + 1, name.bold()));
            if let Some(node) = plan.tools.get(name) {
                if !node.dependencies.is_empty() {
                    output.push_str(&format!(
                        "     {} {}\n",
                        "after:".dimmed(),
                        node.dependencies.join(", ")
                    ));
                }
                if !node.arguments.is_empty() {
                    output.push_str(&format!(
                        "     {} {}\n",
                        "args:".dimmed(),
                        serde_json::Value::Object(node.arguments.clone())
                    ));
                }
            }
        }

        for name in &plan.missing {
            output.push_str(&format!("{} {}\n", "missing:".red().bold(), name));
        }
        for warning in &plan.warnings {
            output.push_str(&format!("{} {}\n", "warning:".yellow().bold(), warning));
        }
        output
    }

    /// Status line followed by the result as pretty JSON
    pub fn format_result(result: &ToolResult) -> String {
        let status = match (&result.error, &result.data) {
            (Some(error), _) => format!("{} {}: {}", "FAILED".red().bold(), error.code, error.message),
            (None, Some(data)) if data.get("requires_user_input").is_some() => {
                format!("{} user input required", "PAUSED".yellow().bold())
            }
            _ => format!("{}", "OK".green().bold()),
        };

        let mut notes = Vec::new();
        if let Some(ms) = result.metadata.duration_ms {
            notes.push(format!("{}ms", ms));
        }
        if result.metadata.cache_hit {
            notes.push("cached".to_string());
        }
        if result.metadata.duplicate {
            notes.push("duplicate".to_string());
        }
        if result.metadata.retry_count > 0 {
            notes.push(format!("{} retries", result.metadata.retry_count));
        }

        let body = serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
        format!("{} {} {}\n{}\n", status, result.tool_name.bold(), notes.join(" ").dimmed(), body)
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }
}
