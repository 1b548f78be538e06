//! Path filters for selecting API description files.
//!
//! A filter is compiled from a list of pattern strings into a
//! [`PatternSet`]. The same set type serves both as the inclusion filter
//! and as the exclusion set; callers decide which effect a match has.

mod error;
mod rule;

pub use error::PatternError;
pub use rule::{PatternRule, REGEX_MARKER};

/// Suffixes matched when the caller supplies no inclusion patterns.
pub const DEFAULT_SUFFIXES: &[&str] = &[".swagger.json", ".swagger.yaml"];

/// A compiled, immutable set of pattern rules.
///
/// `is_match` returns true if any rule matches. An empty set matches
/// nothing; callers that want a catch-all must say so explicitly.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<PatternRule>,
}

impl PatternSet {
    /// Compile a list of pattern strings.
    ///
    /// Empty strings are ignored and duplicates compiled once, keeping
    /// first-seen order. The first invalid regex fails the whole set.
    pub fn compile<I, S>(patterns: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules: Vec<PatternRule> = Vec::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            if pattern.is_empty() || rules.iter().any(|r| r.source() == pattern) {
                continue;
            }
            rules.push(PatternRule::compile(pattern)?);
        }

        Ok(Self { rules })
    }

    /// Set built from [`DEFAULT_SUFFIXES`].
    pub fn default_suffixes() -> Self {
        Self {
            rules: DEFAULT_SUFFIXES
                .iter()
                .map(|s| PatternRule::Suffix((*s).to_string()))
                .collect(),
        }
    }

    /// Check a subject path against every rule.
    pub fn is_match(&self, subject: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(subject))
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Source strings of the compiled rules, in compile order.
    pub fn sources(&self) -> Vec<&str> {
        self.rules.iter().map(PatternRule::source).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::compile(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.is_match("/api/pets.swagger.json"));
        assert!(!set.is_match(""));
    }

    #[test]
    fn test_empty_strings_ignored() {
        let set = PatternSet::compile(["", ".swagger.json", ""]).unwrap();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicates_compiled_once() {
        let set = PatternSet::compile([".swagger.json", ".swagger.yaml", ".swagger.json"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.sources(), vec![".swagger.json", ".swagger.yaml"]);
    }

    #[test]
    fn test_any_rule_matches() {
        let set = PatternSet::compile([".swagger.json", ".swagger.yaml"]).unwrap();
        assert!(set.is_match("/srv/api/user.swagger.json"));
        assert!(set.is_match("/srv/api/user.swagger.yaml"));
        assert!(!set.is_match("/srv/api/user.swagger.yml"));
        assert!(!set.is_match("/srv/api/notes.txt"));
    }

    #[test]
    fn test_default_suffixes() {
        let set = PatternSet::default_suffixes();
        assert_eq!(set.sources(), DEFAULT_SUFFIXES.to_vec());
        assert!(set.is_match("x.swagger.json"));
        assert!(!set.is_match("y.txt"));
    }

    #[test]
    fn test_invalid_regex_fails_whole_set() {
        let err = PatternSet::compile([".swagger.json", "@regexp:(unclosed"]).unwrap_err();
        assert_eq!(err.pattern(), "@regexp:(unclosed");
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_mixed_rule_kinds() {
        let set = PatternSet::compile([".swagger.json", "@regexp:/internal/", "*v2"]).unwrap();
        assert!(set.is_match("/a/b.swagger.json"));
        assert!(set.is_match("/srv/internal/notes.txt"));
        assert!(set.is_match("v2/spec.yaml"));
        assert!(!set.is_match("/srv/public/notes.txt"));
    }
}
