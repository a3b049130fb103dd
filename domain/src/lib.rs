//! Domain layer for conductor
//!
//! This crate contains the core definitions of the tool runtime: tools,
//! their metadata and schemas, the registry, dependency declarations and
//! chain plans. It has no dependencies on infrastructure or presentation
//! concerns and performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! A [`Tool`] is a named operation with a schema and an async `execute`.
//! Tools may additionally expose [`ToolMetadata`] (category, risk, read-only,
//! idempotency) and [`ToolDependency`] lists through optional capability
//! providers. Every outcome is a [`ToolResult`].
//!
//! ## Dependencies
//!
//! A tool can require arguments that another tool supplies, either through
//! callbacks ([`ToolDependency`]) or through the declarative DSL
//! ([`DependencyDeclaration`]): `requires`, `resolver_tool`,
//! `select_strategy` and a field `map` of path expressions.
//!
//! ## Chains
//!
//! A [`ChainPlan`] is the dependency graph reachable from a requested tool
//! plus a dependencies-first execution order.

pub mod chain;
pub mod core;
pub mod dependency;
pub mod tool;

pub use chain::{ChainPlan, PlannedTool};
pub use core::error::DomainError;
pub use dependency::{
    DependencyDeclaration, MergeOutcome, PathExpr, SelectStrategy, Selection, ToolDependency,
};
pub use tool::{
    Arguments, DefaultToolValidator, DependencyProvider, DiscoveryCriteria, ErrorCategory,
    FieldViolation, MetadataProvider, PropertySpec, PropertyType, RiskLevel, Tool, ToolCategory,
    ToolContext, ToolDiscovery, ToolError, ToolFailure, ToolMetadata, ToolRegistry, ToolResult,
    ToolResultMetadata, ToolSchema, ToolSummary, ToolValidator,
};
