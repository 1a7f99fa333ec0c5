//! Source specification and glob-style resolution.
//!
//! A dataset is opened from a single source identifier, a glob-style
//! pattern (`*` and `?` wildcards), or an explicit ordered list. Patterns
//! are expanded against the identifiers the provider reports, not the
//! filesystem: plotfile discovery belongs to the delegated reader.

use amr_common::{AmrError, Result};
use amr_reader::HierarchyProvider;

/// How the dataset's sources are specified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// One source identifier.
    Single(String),
    /// A glob-style pattern (`*` matches any run, `?` one character).
    Pattern(String),
    /// An explicit, ordered list of source identifiers.
    List(Vec<String>),
}

impl SourceSpec {
    /// Resolve to a concrete source list.
    ///
    /// Fails with `Load` when a pattern matches nothing or the list is
    /// empty. Single identifiers pass through; whether they can be
    /// opened is decided by the provider.
    pub fn resolve(&self, provider: &dyn HierarchyProvider) -> Result<Vec<String>> {
        match self {
            SourceSpec::Single(source) => Ok(vec![source.clone()]),
            SourceSpec::Pattern(pattern) => {
                let matched: Vec<String> = provider
                    .sources()
                    .into_iter()
                    .filter(|name| matches_pattern(pattern, name))
                    .collect();
                if matched.is_empty() {
                    return Err(AmrError::load(format!(
                        "no sources match pattern '{pattern}'"
                    )));
                }
                Ok(matched)
            }
            SourceSpec::List(sources) => {
                if sources.is_empty() {
                    return Err(AmrError::load("empty source list"));
                }
                Ok(sources.clone())
            }
        }
    }
}

/// Whether a source string contains glob wildcards.
pub fn is_pattern(source: &str) -> bool {
    source.contains('*') || source.contains('?')
}

/// Match a glob-style pattern (`*`, `?`) against a name.
pub fn matches_pattern(pattern: &str, name: &str) -> bool {
    fn rec(p: &[u8], n: &[u8]) -> bool {
        match (p.first(), n.first()) {
            (None, None) => true,
            (None, Some(_)) => false,
            (Some(b'*'), _) => rec(&p[1..], n) || (!n.is_empty() && rec(p, &n[1..])),
            (Some(b'?'), Some(_)) => rec(&p[1..], &n[1..]),
            (Some(&pc), Some(&nc)) => pc == nc && rec(&p[1..], &n[1..]),
            (Some(_), None) => false,
        }
    }
    rec(pattern.as_bytes(), name.as_bytes())
}

impl From<&str> for SourceSpec {
    fn from(source: &str) -> Self {
        if is_pattern(source) {
            SourceSpec::Pattern(source.to_string())
        } else {
            SourceSpec::Single(source.to_string())
        }
    }
}

impl From<String> for SourceSpec {
    fn from(source: String) -> Self {
        SourceSpec::from(source.as_str())
    }
}

impl From<Vec<String>> for SourceSpec {
    fn from(sources: Vec<String>) -> Self {
        SourceSpec::List(sources)
    }
}

impl From<Vec<&str>> for SourceSpec {
    fn from(sources: Vec<&str>) -> Self {
        SourceSpec::List(sources.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for SourceSpec {
    fn from(sources: &[&str]) -> Self {
        SourceSpec::List(sources.iter().map(|s| s.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use amr_reader::{MemoryHierarchy, MemoryProvider};

    fn provider() -> MemoryProvider {
        let snapshot = |t| {
            MemoryHierarchy::builder(t, &[4, 4])
                .field_fn("u", |c| c[0])
                .build()
                .unwrap()
        };
        MemoryProvider::new()
            .with_hierarchy("plt00000", snapshot(0.0))
            .with_hierarchy("plt00010", snapshot(1.0))
            .with_hierarchy("chk00000", snapshot(0.0))
    }

    #[test]
    fn test_matches_pattern() {
        assert!(matches_pattern("plt*", "plt00000"));
        assert!(matches_pattern("plt000?0", "plt00010"));
        assert!(matches_pattern("*", "anything"));
        assert!(!matches_pattern("plt*", "chk00000"));
        assert!(!matches_pattern("plt000?0", "plt000100"));
    }

    #[test]
    fn test_from_detects_pattern() {
        assert_eq!(
            SourceSpec::from("plt*"),
            SourceSpec::Pattern("plt*".to_string())
        );
        assert_eq!(
            SourceSpec::from("plt00000"),
            SourceSpec::Single("plt00000".to_string())
        );
    }

    #[test]
    fn test_resolve_pattern() {
        let p = provider();
        let sources = SourceSpec::from("plt*").resolve(&p).unwrap();
        assert_eq!(sources, vec!["plt00000", "plt00010"]);
    }

    #[test]
    fn test_resolve_pattern_no_match() {
        let p = provider();
        let err = SourceSpec::from("nope*").resolve(&p).unwrap_err();
        assert!(matches!(err, AmrError::Load(_)));
    }

    #[test]
    fn test_resolve_list_preserves_order() {
        let p = provider();
        let spec = SourceSpec::from(vec!["plt00010", "plt00000"]);
        assert_eq!(spec.resolve(&p).unwrap(), vec!["plt00010", "plt00000"]);
    }

    #[test]
    fn test_resolve_empty_list() {
        let p = provider();
        let err = SourceSpec::List(Vec::new()).resolve(&p).unwrap_err();
        assert!(matches!(err, AmrError::Load(_)));
    }
}
