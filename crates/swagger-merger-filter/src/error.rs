//! Pattern compilation errors.

/// A pattern string could not be compiled into a rule.
#[derive(Debug, thiserror::Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    pattern: String,
    #[source]
    source: regex_lite::Error,
}

impl PatternError {
    pub(crate) fn new(pattern: &str, source: regex_lite::Error) -> Self {
        Self {
            pattern: pattern.to_string(),
            source,
        }
    }

    /// The pattern string as the caller supplied it.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
