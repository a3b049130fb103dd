//! Tool naming convention
//!
//! Tool names are dot-segmented and end with an HTTP-style verb
//! (`core.teams.GET`, `core.teams.POST`). An older generation of tools used
//! lowercase action suffixes (`core.teams.list`, `core.teams.create`); the
//! registry bridges both through [`legacy_alias_candidates`], and discovery
//! infers metadata from the suffix via [`infer_metadata`].

use super::entities::ToolMetadata;

/// Verb suffix ↔ legacy suffix pairs. Lookups may go either direction.
const ALIAS_PAIRS: &[(&str, &str)] = &[
    ("GET", "list"),
    ("POST", "create"),
    ("PUT", "update"),
    ("DELETE", "delete"),
    ("get", "list"),
];

const QUERY_SUFFIXES: &[&str] = &["GET", "list", "get", "search", "describe"];
const ACTION_SUFFIXES: &[&str] = &["POST", "PUT", "DELETE", "create", "update", "delete"];

/// Text before the first `.` (the whole name when there is none).
pub fn module_prefix(name: &str) -> &str {
    name.split('.').next().unwrap_or(name)
}

/// Text after the last `.`, if the name has more than one segment.
pub fn verb_suffix(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(_, suffix)| suffix)
}

fn swap_suffix(name: &str) -> Vec<String> {
    let Some((stem, suffix)) = name.rsplit_once('.') else {
        return Vec::new();
    };
    ALIAS_PAIRS
        .iter()
        .filter_map(|&(verb, legacy)| {
            if suffix == verb {
                Some(legacy)
            } else if suffix == legacy {
                Some(verb)
            } else {
                None
            }
        })
        .map(|replacement| format!("{}.{}", stem, replacement))
        .collect()
}

/// Alternative names to try when `name` is not registered directly.
///
/// Applies the suffix substitution table (both directions) and one further
/// hop, so `core.teams.get` reaches `core.teams.list` and then
/// `core.teams.GET`. The original name is never included.
pub fn legacy_alias_candidates(name: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    for first in swap_suffix(name) {
        if first != name && !candidates.contains(&first) {
            candidates.push(first);
        }
    }
    let first_hop = candidates.clone();
    for hop in first_hop {
        for second in swap_suffix(&hop) {
            if second != name && !candidates.contains(&second) {
                candidates.push(second);
            }
        }
    }
    candidates
}

/// Infer metadata for a tool that does not describe itself.
///
/// Query suffixes are read-only; write suffixes are actions; anything else
/// is a read-only utility.
pub fn infer_metadata(name: &str) -> ToolMetadata {
    match verb_suffix(name) {
        Some(suffix) if QUERY_SUFFIXES.contains(&suffix) => ToolMetadata::query(),
        Some(suffix) if ACTION_SUFFIXES.contains(&suffix) => ToolMetadata::action(),
        _ => ToolMetadata::utility(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCategory;

    #[test]
    fn test_module_prefix() {
        assert_eq!(module_prefix("core.teams.GET"), "core");
        assert_eq!(module_prefix("echo"), "echo");
    }

    #[test]
    fn test_verb_suffix() {
        assert_eq!(verb_suffix("core.teams.GET"), Some("GET"));
        assert_eq!(verb_suffix("echo"), None);
    }

    #[test]
    fn test_alias_candidates_forward_and_reverse() {
        assert_eq!(legacy_alias_candidates("core.teams.GET"), vec!["core.teams.list"]);
        assert_eq!(
            legacy_alias_candidates("core.teams.list"),
            vec!["core.teams.GET", "core.teams.get"]
        );
        assert_eq!(legacy_alias_candidates("core.teams.POST"), vec!["core.teams.create"]);
        assert_eq!(legacy_alias_candidates("core.teams.update"), vec!["core.teams.PUT"]);
        assert_eq!(legacy_alias_candidates("core.teams.DELETE"), vec!["core.teams.delete"]);
    }

    #[test]
    fn test_alias_candidates_second_hop() {
        assert_eq!(
            legacy_alias_candidates("core.teams.get"),
            vec!["core.teams.list", "core.teams.GET"]
        );
    }

    #[test]
    fn test_alias_candidates_unknown_suffix() {
        assert!(legacy_alias_candidates("core.teams.sync").is_empty());
        assert!(legacy_alias_candidates("echo").is_empty());
    }

    #[test]
    fn test_infer_metadata() {
        let meta = infer_metadata("core.teams.GET");
        assert_eq!(meta.category, ToolCategory::Query);
        assert!(meta.read_only);

        let meta = infer_metadata("core.teams.search");
        assert!(meta.read_only);

        let meta = infer_metadata("core.teams.DELETE");
        assert_eq!(meta.category, ToolCategory::Action);
        assert!(!meta.read_only);

        let meta = infer_metadata("core.teams.create");
        assert_eq!(meta.category, ToolCategory::Action);

        let meta = infer_metadata("echo");
        assert_eq!(meta.category, ToolCategory::Utility);
        assert!(meta.read_only);
    }
}
