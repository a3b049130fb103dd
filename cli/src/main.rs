//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod catalog;
mod commands;
mod output;

use anyhow::{Context, Result, bail};
use clap::Parser;
use commands::{Cli, Command, ToolsArgs};
use conductor_application::{
    CompositeTelemetrySink, ExecuteToolUseCase, NoMemoryProbe, TelemetrySink, ToolOrchestrator,
};
use conductor_domain::tool::{Arguments, DiscoveryCriteria, ToolContext, ToolDiscovery, ToolRegistry};
use conductor_infrastructure::{
    ConfigLoader, FileConfig, FixedWindowRateLimiter, InMemoryCacheStore,
    InMemoryIdempotencyStore, JsonlTelemetrySink, ProcessMemoryProbe, TracingTelemetrySink,
};
use output::ConsoleFormatter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting conductor");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    // === Dependency Injection ===
    let registry = catalog::demo_registry();
    let context = caller_context(&cli);
    let mut failed = false;

    match cli.command {
        Command::Tools(filters) => {
            let discovery = ToolDiscovery::new(registry);
            let tools = discovery.discover(&criteria(filters));
            print!("{}", ConsoleFormatter::format_tool_list(&tools, &discovery.categories()));
        }
        Command::Describe { tool } => {
            let Some(found) = registry.get(&tool) else {
                bail!("Unknown tool: {}", tool);
            };
            let related = ToolDiscovery::new(registry.clone()).related(found.name());
            print!("{}", ConsoleFormatter::format_tool_details(found.as_ref(), &related));
        }
        Command::Plan { tool, args } => {
            let orchestrator = build_orchestrator(registry, &config);
            let plan = orchestrator.planner().plan(&tool, &parse_arguments(&args)?, &context);
            print!("{}", ConsoleFormatter::format_plan(&plan));
        }
        Command::Run {
            tool,
            args,
            max_depth,
            plan_first,
        } => {
            let orchestrator = build_orchestrator(registry, &config);
            let max_depth = max_depth.unwrap_or(orchestrator.config().default_max_depth);
            let plan_first = plan_first || orchestrator.config().plan_first;

            let result = orchestrator
                .execute_with_dependencies(&tool, &parse_arguments(&args)?, &context, max_depth, plan_first)
                .await;
            print!("{}", ConsoleFormatter::format_result(&result));
            failed = !result.is_success();
        }
        Command::Config => {
            ConfigLoader::print_config_sources(cli.config.as_ref());
            println!();
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    if failed {
        drop(log_guard);
        std::process::exit(1);
    }
    Ok(())
}

/// Install the tracing subscriber.
///
/// The filter follows `-v` unless `RUST_LOG` is set. With a log file, events
/// go to stderr and the file; the returned guard flushes the file on exit.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let Some(path) = log_file else {
        builder.with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let Some(file_name) = path.file_name() else {
        bail!("Invalid log file path: {}", path.display());
    };
    std::fs::create_dir_all(directory)
        .with_context(|| format!("Failed to create log directory {}", directory.display()))?;

    let (file_writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name));
    builder
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .init();
    Ok(Some(guard))
}

fn caller_context(cli: &Cli) -> ToolContext {
    let mut context = ToolContext::new();
    if let Some(principal) = &cli.principal {
        context = context.with_principal(principal.clone());
    }
    if let Some(team) = &cli.team {
        context = context.with_team(team.clone());
    }
    context
}

fn criteria(filters: ToolsArgs) -> DiscoveryCriteria {
    let mut criteria = DiscoveryCriteria::new();
    if let Some(category) = filters.category {
        criteria = criteria.category(category);
    }
    for tag in filters.tags {
        criteria = criteria.tag(tag);
    }
    if let Some(module) = filters.module {
        criteria = criteria.module(module);
    }
    if filters.read_only {
        criteria = criteria.read_only(true);
    }
    if let Some(search) = filters.search {
        criteria = criteria.search(search);
    }
    criteria
}

fn parse_arguments(raw: &str) -> Result<Arguments> {
    match serde_json::from_str(raw).context("--args must be valid JSON")? {
        serde_json::Value::Object(arguments) => Ok(arguments),
        other => bail!("--args must be a JSON object, got {}", other),
    }
}

fn telemetry(config: &FileConfig) -> Arc<dyn TelemetrySink> {
    let mut sinks = CompositeTelemetrySink::default();
    if config.telemetry.tracing {
        sinks = sinks.with_sink(Arc::new(TracingTelemetrySink));
    }
    if let Some(path) = &config.telemetry.jsonl_path {
        match JsonlTelemetrySink::new(path) {
            Some(sink) => sinks = sinks.with_sink(Arc::new(sink)),
            None => warn!(path = %path.display(), "JSONL telemetry disabled"),
        }
    }
    Arc::new(sinks)
}

fn build_orchestrator(
    registry: Arc<ToolRegistry>,
    config: &FileConfig,
) -> ToolOrchestrator<ExecuteToolUseCase> {
    let executor_config = config.to_executor_config();
    for key in executor_config.unknown_tool_keys(&registry) {
        warn!(tool = %key, "Configured override names no registered tool; ignored");
    }

    let mut executor = ExecuteToolUseCase::new(registry)
        .with_config(executor_config)
        .with_telemetry(telemetry(config));

    if config.cache.enabled {
        executor = executor.with_cache(Arc::new(InMemoryCacheStore::new(config.cache.max_entries)));
    }
    if config.rate_limit.enabled {
        executor = executor.with_rate_limiter(Arc::new(FixedWindowRateLimiter::new()));
    }
    if config.idempotency.enabled {
        executor = executor.with_idempotency_store(Arc::new(InMemoryIdempotencyStore::new()));
    }
    executor = if config.telemetry.memory {
        executor.with_memory_probe(Arc::new(ProcessMemoryProbe::new()))
    } else {
        executor.with_memory_probe(Arc::new(NoMemoryProbe))
    };

    ToolOrchestrator::new(Arc::new(executor)).with_config(config.to_orchestrator_config())
}
