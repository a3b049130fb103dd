//! Tool domain module
//!
//! This module defines the core abstractions of the **Tool System**: how an
//! agent's requested operations are described, looked up, filtered and
//! validated before anything runs.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ Tool         │───▶│ ToolResult   │
//! │ (lookup)     │    │ (execute)    │    │ (outcome)    │
//! └──────┬───────┘    └──────┬───────┘    └──────────────┘
//!        │                   ├─ MetadataProvider   (optional)
//!        │                   └─ DependencyProvider (optional)
//!        └─ legacy aliases: "core.teams.list" → "core.teams.GET"
//! ```
//!
//! # Key Types
//!
//! - [`Tool`]: the contract every tool satisfies
//! - [`ToolRegistry`]: name → tool lookup with legacy alias resolution
//! - [`ToolDiscovery`]: metadata-driven filtering and search
//! - [`ToolSchema`] / [`ToolValidator`]: argument shape and validation
//! - [`ToolResult`] / [`ToolError`]: the universal outcome type
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ExecuteToolUseCase`): the only place tools run
//! - **Infrastructure**: stores, telemetry sinks and builtin tools

pub mod discovery;
pub mod entities;
pub mod naming;
pub mod registry;
pub mod traits;
pub mod value_objects;

pub use discovery::{DiscoveryCriteria, ToolDiscovery, ToolSummary};
pub use entities::{
    Arguments, PropertySpec, PropertyType, RiskLevel, ToolCategory, ToolContext, ToolMetadata,
    ToolSchema,
};
pub use registry::ToolRegistry;
pub use traits::{DefaultToolValidator, DependencyProvider, MetadataProvider, Tool, ToolValidator};
pub use value_objects::{
    ErrorCategory, FieldViolation, ToolError, ToolFailure, ToolResult, ToolResultMetadata,
};
