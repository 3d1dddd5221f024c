use proptest::prelude::*;

use roomlink::{PathPattern, PatternError};

fn path(text: &str) -> Vec<String> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('/').map(str::to_string).collect()
    }
}

// ============================================================================
// Parse Error Tests
// ============================================================================

#[test]
fn test_parse_duplicate_wildcard_name() {
    let result = PathPattern::parse("rooms/:name/players/:name");
    assert!(result.is_err());

    match result {
        Err(PatternError::DuplicateWildcard { pattern, name }) => {
            assert_eq!(pattern, "rooms/:name/players/:name");
            assert_eq!(name, "name");
        }
        _ => panic!("Expected DuplicateWildcard error"),
    }
}

#[test]
fn test_parse_empty_wildcard_name() {
    let result = PathPattern::parse(":");
    assert!(result.is_err());

    match result {
        Err(PatternError::EmptyWildcard { pattern }) => {
            assert_eq!(pattern, ":");
        }
        _ => panic!("Expected EmptyWildcard error"),
    }
}

#[test]
fn test_parse_same_literal_twice_is_legal() {
    // Only wildcard names must be unique; repeated literals are fine.
    let result = PathPattern::parse("players/players");
    assert!(result.is_ok());
}

// ============================================================================
// Match Contract Tests
// ============================================================================

#[test]
fn test_match_binds_wildcards_by_name() {
    let pattern = PathPattern::parse("players/:id/:axis").unwrap();

    let bindings = pattern.matches(&path("players/7/x")).unwrap();
    assert_eq!(bindings.get("id"), Some("7"));
    assert_eq!(bindings.get("axis"), Some("x"));
    assert_eq!(bindings.len(), 2);
}

#[test]
fn test_match_rejects_literal_mismatch() {
    let pattern = PathPattern::parse("players/:id").unwrap();
    assert!(pattern.matches(&path("messages/7")).is_none());
}

#[test]
fn test_match_is_case_sensitive() {
    let pattern = PathPattern::parse("players/:id").unwrap();
    assert!(pattern.matches(&path("Players/7")).is_none());
}

#[test]
fn test_root_pattern_matches_only_empty_path() {
    let root = PathPattern::parse("").unwrap();
    assert!(root.matches(&path("")).is_some());
    assert!(root.matches(&path("players")).is_none());
}

// ============================================================================
// Match Properties
// ============================================================================

proptest! {
    // Match succeeds iff lengths are equal and every literal equals the
    // same-index concrete segment; prefix and extension paths never match.
    #[test]
    fn prop_literal_pattern_matches_exactly_itself(
        segments in proptest::collection::vec("[a-z0-9]{1,8}", 0..6),
        extra in "[a-z0-9]{1,8}",
    ) {
        let text = segments.join("/");
        let pattern = PathPattern::parse(&text).unwrap();

        prop_assert!(pattern.matches(&segments).is_some());

        let mut longer = segments.clone();
        longer.push(extra);
        prop_assert!(pattern.matches(&longer).is_none());

        if !segments.is_empty() {
            prop_assert!(pattern.matches(&segments[..segments.len() - 1]).is_none());
        }
    }

    #[test]
    fn prop_wildcards_bind_same_index_segments(
        segments in proptest::collection::vec("[a-z0-9]{1,8}", 1..6),
    ) {
        let text = (0..segments.len())
            .map(|i| format!(":w{i}"))
            .collect::<Vec<_>>()
            .join("/");
        let pattern = PathPattern::parse(&text).unwrap();

        let bindings = pattern.matches(&segments).unwrap();
        prop_assert_eq!(bindings.len(), segments.len());
        for (i, segment) in segments.iter().enumerate() {
            prop_assert_eq!(bindings.get(&format!("w{i}")), Some(segment.as_str()));
        }
    }
}
