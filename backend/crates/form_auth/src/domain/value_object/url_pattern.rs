//! URL Pattern Value Object
//!
//! A regular expression evaluated against the context-relative request path.
//!
//! ## Invariants
//! - Matching is whole-string: `.*\.css` matches `/a/b.css` but `\.css` does not
//! - The operator's source text is kept verbatim for display

use std::fmt;

use regex::Regex;

use crate::error::{GateError, GateResult, PatternKind};

/// Static assets served without authentication unless configured otherwise
pub const DEFAULT_EXCLUDE_PATTERN: &str =
    r".*\.ico|.*\.png|.*\.jpg|.*\.jpeg|.*\.bmp|.*\.gif|.*\.css|.*\.js";

/// Compiled full-match URL pattern
#[derive(Clone)]
pub struct UrlPattern {
    source: String,
    regex: Regex,
}

impl UrlPattern {
    /// Compile `source`, anchored at both ends
    pub fn new(kind: PatternKind, source: &str) -> GateResult<Self> {
        let regex =
            Regex::new(&format!("^(?:{source})$")).map_err(|e| GateError::InvalidPattern {
                kind,
                pattern: source.to_string(),
                source: e,
            })?;

        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    /// The static-asset exclude pattern
    pub fn default_exclude() -> Self {
        Self::new(PatternKind::Exclude, DEFAULT_EXCLUDE_PATTERN)
            .expect("default exclude pattern is a valid regex")
    }

    /// Whole-string match
    pub fn matches(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("UrlPattern").field(&self.source).finish()
    }
}

impl fmt::Display for UrlPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for UrlPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for UrlPattern {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_match_semantics() {
        let pattern = UrlPattern::new(PatternKind::Include, r"/admin/.*").unwrap();
        assert!(pattern.matches("/admin/users"));
        assert!(!pattern.matches("/public/admin/users"));

        let suffix_only = UrlPattern::new(PatternKind::Exclude, r"\.css").unwrap();
        assert!(!suffix_only.matches("/css/my.css"));
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        // Without the group, `^a|b$` would match "bxx" through the first branch.
        let pattern = UrlPattern::new(PatternKind::Include, "/a|/b").unwrap();
        assert!(pattern.matches("/a"));
        assert!(pattern.matches("/b"));
        assert!(!pattern.matches("/a/x"));
        assert!(!pattern.matches("/x/b"));
    }

    #[test]
    fn test_default_exclude() {
        let pattern = UrlPattern::default_exclude();
        for path in [
            "/favicon.ico",
            "/img/a.png",
            "/img/a.jpg",
            "/img/a.jpeg",
            "/img/a.bmp",
            "/img/a.gif",
            "/css/my.css",
            "/js/app.js",
        ] {
            assert!(pattern.matches(path), "{path} should match");
        }
        assert!(!pattern.matches("/home.jsp"));
        assert!(!pattern.matches("/app.json"));
        assert!(!pattern.matches("/home"));
        assert_eq!(pattern.as_str(), DEFAULT_EXCLUDE_PATTERN);
    }

    #[test]
    fn test_invalid_pattern() {
        let result = UrlPattern::new(PatternKind::Exclude, "([unclosed");
        assert!(matches!(
            result,
            Err(GateError::InvalidPattern {
                kind: PatternKind::Exclude,
                ..
            })
        ));
    }
}
