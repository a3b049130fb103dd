//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid path expression '{expression}': {reason}")]
    InvalidPath { expression: String, reason: String },

    #[error("Expected exactly one candidate from '{tool}', found {count}")]
    SelectionFailed { tool: String, count: usize },

    #[error("Dependency on '{tool}' could not be satisfied: {reason}")]
    UnresolvedDependency { tool: String, reason: String },
}

impl DomainError {
    pub fn invalid_path(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidPath {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error came from a `fail` selection strategy
    pub fn is_selection_failure(&self) -> bool {
        matches!(self, DomainError::SelectionFailed { .. })
    }
}
