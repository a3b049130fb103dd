//! Minimal path language for mapping resolver output into arguments.
//!
//! Supported: an optional `$` root, `.key` segments and `[index]` segments
//! (`$.teams[0].id`, `items[2]`, `id`). Wildcards, filters, recursive
//! descent and functions are rejected at parse time.

use std::str::FromStr;

use serde_json::Value;

use crate::core::error::DomainError;

/// One step of a [`PathExpr`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// A parsed path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpr {
    expression: String,
    segments: Vec<PathSegment>,
}

impl PathExpr {
    pub fn parse(expression: &str) -> Result<Self, DomainError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_path(expression, "empty expression"));
        }

        let body = trimmed.strip_prefix('$').unwrap_or(trimmed);
        let mut segments = Vec::new();
        let mut chars = body.chars().peekable();
        let mut expect_key = !body.is_empty() && !body.starts_with(['.', '[']);

        loop {
            if expect_key {
                let mut key = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' || c == '[' {
                        break;
                    }
                    key.push(c);
                    chars.next();
                }
                validate_key(expression, &key)?;
                segments.push(PathSegment::Key(key));
                expect_key = false;
                continue;
            }

            match chars.next() {
                None => break,
                Some('.') => expect_key = true,
                Some('[') => {
                    let mut inner = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        inner.push(c);
                    }
                    if !closed {
                        return Err(DomainError::invalid_path(expression, "unclosed '['"));
                    }
                    segments.push(PathSegment::Index(parse_index(expression, &inner)?));
                }
                Some(c) => {
                    return Err(DomainError::invalid_path(
                        expression,
                        format!("unexpected character '{}'", c),
                    ));
                }
            }
        }

        Ok(Self {
            expression: trimmed.to_string(),
            segments,
        })
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// Walk `value`; `None` when any segment does not resolve.
    pub fn evaluate<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(value, |current, segment| match segment {
                PathSegment::Key(key) => current.as_object()?.get(key),
                PathSegment::Index(index) => current.as_array()?.get(*index),
            })
    }
}

impl FromStr for PathExpr {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for PathExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.expression)
    }
}

fn validate_key(expression: &str, key: &str) -> Result<(), DomainError> {
    if key.is_empty() {
        return Err(DomainError::invalid_path(
            expression,
            "empty segment (recursive descent is not supported)",
        ));
    }
    if key.contains('*') {
        return Err(DomainError::invalid_path(expression, "wildcards are not supported"));
    }
    if key.contains(['(', ')']) {
        return Err(DomainError::invalid_path(expression, "functions are not supported"));
    }
    if key.contains([']', '?', '@']) {
        return Err(DomainError::invalid_path(
            expression,
            format!("invalid segment '{}'", key),
        ));
    }
    Ok(())
}

fn parse_index(expression: &str, inner: &str) -> Result<usize, DomainError> {
    let inner = inner.trim();
    if inner == "*" {
        return Err(DomainError::invalid_path(expression, "wildcards are not supported"));
    }
    if inner.starts_with('?') {
        return Err(DomainError::invalid_path(expression, "filters are not supported"));
    }
    inner.parse::<usize>().map_err(|_| {
        DomainError::invalid_path(
            expression,
            format!("only numeric indexes are supported, got '{}'", inner),
        )
    })
}
