//! Dependency domain module
//!
//! Two related mechanisms describe what a tool needs before it can run:
//!
//! - [`DependencyDeclaration`]: a declarative DSL (`requires`,
//!   `resolver_tool`, `select_strategy`, `map`) interpreted generically by
//!   the application layer's `DependencyResolver`, with no tool-specific code.
//! - [`ToolDependency`]: callback-shaped tuples (`condition`, `args`,
//!   `merge_result`) returned by a tool's
//!   [`DependencyProvider`](crate::tool::DependencyProvider), consumed by the
//!   chain planner and the orchestrator.
//!
//! A declaration converts into a `ToolDependency` via
//! [`DependencyDeclaration::to_dependency`], so both share the same
//! extract → select → map path.

pub mod declaration;
pub mod path;
pub mod selection;
pub mod tool_dependency;

pub use declaration::{DependencyDeclaration, SelectStrategy};
pub use path::{PathExpr, PathSegment};
pub use selection::{LIST_KEYS, Selection, apply_mapping, extract_candidates, select};
pub use tool_dependency::{
    ArgumentsBuilder, DependencyCondition, MergeOutcome, ResultMerger, ToolDependency,
};
