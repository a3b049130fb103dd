//! Chain domain module
//!
//! A [`ChainPlan`] is the pre-flight report for a requested tool: which
//! tools its dependency graph touches, the order they would run in, and
//! what is missing or cyclic. Plans are built fresh per request and never
//! persisted.

pub mod entities;

pub use entities::{ChainPlan, PlannedTool};
