//! Builtin tools
//!
//! - [`EchoTool`]: returns its `message` argument, useful for wiring checks
//! - [`FunctionTool`]: wraps a closure with a schema, metadata and
//!   dependencies so tools can be declared without a dedicated type

mod echo;
mod function;

pub use echo::{ECHO, EchoTool};
pub use function::FunctionTool;
