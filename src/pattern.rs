use crate::error::PatternError;

/// Marker character that begins a wildcard segment in a pattern string.
const WILDCARD_MARKER: char = ':';

/// One segment of a parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text, case-sensitively
    Literal(String),
    /// Matches any single concrete segment, binding it under the given name
    Wildcard(String),
}

/// A parsed, immutable slash-delimited path pattern such as
/// `players/:id/:axis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    text: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parses a pattern string. A segment beginning with `:` becomes a
    /// wildcard named by the rest of the segment, anything else a literal.
    /// The empty string parses to the root pattern, which matches only the
    /// empty path.
    pub fn parse(text: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        if !text.is_empty() {
            for raw in text.split('/') {
                match raw.strip_prefix(WILDCARD_MARKER) {
                    Some("") => {
                        return Err(PatternError::EmptyWildcard {
                            pattern: text.to_string(),
                        });
                    }
                    Some(name) => {
                        let duplicate = segments
                            .iter()
                            .any(|s| matches!(s, Segment::Wildcard(n) if n == name));
                        if duplicate {
                            return Err(PatternError::DuplicateWildcard {
                                pattern: text.to_string(),
                                name: name.to_string(),
                            });
                        }
                        segments.push(Segment::Wildcard(name.to_string()));
                    }
                    None => segments.push(Segment::Literal(raw.to_string())),
                }
            }
        }
        Ok(Self {
            text: text.to_string(),
            segments,
        })
    }

    /// The pattern's original textual form.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Matches against a concrete path. Succeeds only when the path has
    /// exactly as many segments as the pattern and every literal equals the
    /// same-index concrete segment; wildcards always match and contribute
    /// their bound value. Deeper or shallower paths never match.
    pub fn matches(&self, path: &[String]) -> Option<Bindings> {
        if path.len() != self.segments.len() {
            return None;
        }
        let mut bindings = Bindings::new();
        for (segment, concrete) in self.segments.iter().zip(path) {
            match segment {
                Segment::Literal(text) => {
                    if text != concrete {
                        return None;
                    }
                }
                Segment::Wildcard(name) => bindings.push(name, concrete),
            }
        }
        Some(bindings)
    }
}

/// Splits a slash-delimited concrete path into its segments. The empty
/// path has zero segments.
pub(crate) fn split_path(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').map(str::to_string).collect()
}

/// Wildcard values captured during a single match, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<(String, String)>,
}

impl Bindings {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.entries.push((name.to_string(), value.to_string()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl std::ops::Index<&str> for Bindings {
    type Output = str;

    fn index(&self, name: &str) -> &str {
        match self.get(name) {
            Some(value) => value,
            None => panic!("no binding named '{}'", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(text: &str) -> Vec<String> {
        split_path(text)
    }

    #[test]
    fn test_parse_literal_and_wildcard_segments() {
        let pattern = PathPattern::parse("players/:id/:axis").unwrap();
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal("players".to_string()),
                Segment::Wildcard("id".to_string()),
                Segment::Wildcard("axis".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_duplicate_wildcard_names() {
        let result = PathPattern::parse("players/:id/:id");
        assert_eq!(
            result,
            Err(PatternError::DuplicateWildcard {
                pattern: "players/:id/:id".to_string(),
                name: "id".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_rejects_empty_wildcard_name() {
        let result = PathPattern::parse("players/:");
        assert_eq!(
            result,
            Err(PatternError::EmptyWildcard {
                pattern: "players/:".to_string(),
            })
        );
    }

    #[test]
    fn test_root_pattern_matches_only_empty_path() {
        let root = PathPattern::parse("").unwrap();
        assert!(root.matches(&path("")).is_some());
        assert!(root.matches(&path("players")).is_none());
    }

    #[test]
    fn test_literal_match_is_case_sensitive() {
        let pattern = PathPattern::parse("players/7").unwrap();
        assert!(pattern.matches(&path("players/7")).is_some());
        assert!(pattern.matches(&path("Players/7")).is_none());
    }

    #[test]
    fn test_no_prefix_matches() {
        let pattern = PathPattern::parse("players/:id").unwrap();
        assert!(pattern.matches(&path("players")).is_none());
        assert!(pattern.matches(&path("players/7/x")).is_none());
    }

    #[test]
    fn test_bindings_preserve_pattern_order() {
        let pattern = PathPattern::parse("players/:id/:axis").unwrap();
        let bindings = pattern.matches(&path("players/7/x")).unwrap();
        let entries: Vec<(&str, &str)> = bindings.iter().collect();
        assert_eq!(entries, vec![("id", "7"), ("axis", "x")]);
        assert_eq!(&bindings["id"], "7");
        assert_eq!(&bindings["axis"], "x");
    }
}
