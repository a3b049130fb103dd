//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for conductor
#[derive(Parser, Debug)]
#[command(name = "conductor")]
#[command(author, version, about = "Tool orchestration runtime with dependency chaining")]
#[command(long_about = r#"
Conductor runs named tools through a guarded pipeline:
lookup, idempotency, rate limit, schema validation, cache, execution with
a timeout and telemetry. Tools may declare dependencies that run first and
fill in missing arguments.

Configuration files are loaded from (in priority order):
1. CONDUCTOR_* environment variables
2. --config <path>     Explicit config file
3. ./conductor.toml    Project-level config
4. ~/.config/conductor/config.toml   Global config

Example:
  conductor tools --read-only
  conductor plan core.team_members.GET
  conductor --principal u1 run core.team_members.GET
  conductor run echo --args '{"message": "hi"}'
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Principal (user id) the calls are made for
    #[arg(long, value_name = "ID", global = true)]
    pub principal: Option<String>,

    /// Team the calls are made for
    #[arg(long, value_name = "ID", global = true)]
    pub team: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered tools
    Tools(ToolsArgs),

    /// Show a tool's schema, metadata and dependencies
    Describe {
        /// Tool name (legacy names are accepted)
        tool: String,
    },

    /// Show the dependency chain of a tool without running anything
    Plan {
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        args: String,
    },

    /// Run a tool after its dependencies
    Run {
        tool: String,

        /// Arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        args: String,

        /// Depth budget (defaults to orchestrator.max_depth)
        #[arg(long, value_name = "N")]
        max_depth: Option<u32>,

        /// Log the chain plan before running
        #[arg(long)]
        plan_first: bool,
    },

    /// Show configuration sources and the effective configuration
    Config,
}

/// Filters for `conductor tools`
#[derive(Args, Debug, Default)]
pub struct ToolsArgs {
    #[arg(long)]
    pub category: Option<String>,

    /// Required tag (repeatable)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Name prefix before the first `.`
    #[arg(long)]
    pub module: Option<String>,

    #[arg(long)]
    pub read_only: bool,

    /// Free text over name and description
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}
