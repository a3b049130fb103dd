//! Use cases
//!
//! - [`execute_tool`]: the per-call executor pipeline
//! - [`resolve_dependency`]: the declarative dependency resolver
//! - [`plan_chain`]: dependency graph and execution order
//! - [`orchestrate`]: dependencies first, then the requested tool

pub mod execute_tool;
pub mod orchestrate;
pub mod plan_chain;
pub mod resolve_dependency;
pub mod shared;

#[cfg(test)]
pub(crate) mod test_support;
