//! Demo tool catalog wired into the CLI

use conductor_domain::dependency::DependencyDeclaration;
use conductor_domain::tool::{
    Arguments, PropertyType, ToolContext, ToolFailure, ToolMetadata, ToolRegistry, ToolSchema,
};
use conductor_infrastructure::{EchoTool, FunctionTool};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub const TEAMS_GET: &str = "core.teams.GET";
pub const TEAM_MEMBERS_GET: &str = "core.team_members.GET";
pub const TEAMS_POST: &str = "core.teams.POST";

/// Teams visible to a principal. `u1` has one team, `u2` has two.
fn teams_for(context: &ToolContext) -> Value {
    match context.principal_id.as_deref() {
        Some("u1") => json!([{ "id": 7, "name": "Acme" }]),
        Some("u2") => json!([
            { "id": 7, "name": "Acme" },
            { "id": 8, "name": "Globex" }
        ]),
        _ => json!([]),
    }
}

fn members_of(team_id: i64) -> Value {
    match team_id {
        7 => json!(["ada", "grace"]),
        8 => json!(["linus"]),
        _ => json!([]),
    }
}

fn team_id(arguments: &Arguments) -> Result<i64, ToolFailure> {
    arguments
        .get("team_id")
        .and_then(Value::as_i64)
        .ok_or_else(|| ToolFailure::InvalidInput("team_id must be an integer".to_string()))
}

/// Registry with the demo tools.
pub fn demo_registry() -> Arc<ToolRegistry> {
    let registry = Arc::new(ToolRegistry::new());
    registry.register(Arc::new(EchoTool::new()));

    registry.register(Arc::new(
        FunctionTool::new(TEAMS_GET, "List the caller's teams", |_, context| {
            Ok(json!({ "teams": teams_for(context) }))
        })
        .with_metadata(
            ToolMetadata::query()
                .with_tag("teams")
                .with_related_tool(TEAM_MEMBERS_GET)
                .with_related_tool(TEAMS_POST),
        ),
    ));

    let team_selection = DependencyDeclaration::new(TEAMS_GET)
        .requires("team_id")
        .map_field("team_id", "id");
    let mut members = FunctionTool::new(TEAM_MEMBERS_GET, "List the members of a team", |arguments, _| {
        let team_id = team_id(arguments)?;
        Ok(json!({ "team_id": team_id, "members": members_of(team_id) }))
    })
    .with_schema(ToolSchema::new().required_property("team_id", PropertyType::Integer, "Team id"))
    .with_metadata(
        ToolMetadata::query()
            .with_tag("teams")
            .with_related_tool(TEAMS_GET),
    );
    if let Some(dependency) = team_selection.to_dependency() {
        members = members.with_dependency(dependency);
    }
    registry.register(Arc::new(members));

    let next_id = AtomicU64::new(100);
    registry.register(Arc::new(
        FunctionTool::new(TEAMS_POST, "Create a team", move |arguments, context| {
            let name = arguments
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| ToolFailure::InvalidInput("name must be a string".to_string()))?;
            Ok(json!({
                "id": next_id.fetch_add(1, Ordering::SeqCst),
                "name": name,
                "owner": context.principal_id,
            }))
        })
        .with_schema(ToolSchema::new().required_property("name", PropertyType::String, "Team name"))
        .with_metadata(ToolMetadata::action().idempotent().with_tag("teams")),
    ));

    registry
}
