//! Single pattern rules and their normalization.

use regex_lite::Regex;

use crate::PatternError;

/// Prefix that marks the rest of a pattern as a raw regular expression.
pub const REGEX_MARKER: &str = "@regexp:";

/// One compiled matcher.
///
/// Plain patterns become [`PatternRule::Suffix`] and match literally at
/// the end of the subject. Patterns with the [`REGEX_MARKER`] prefix, or
/// with a leading/trailing `*`, become [`PatternRule::Regex`].
#[derive(Debug, Clone)]
pub enum PatternRule {
    /// Subject must end with this literal string.
    Suffix(String),
    /// Subject must match this expression somewhere.
    Regex {
        /// Pattern as supplied, before normalization.
        source: String,
        regex: Regex,
    },
}

impl PatternRule {
    /// Compile one non-empty pattern string.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if let Some(raw) = pattern.strip_prefix(REGEX_MARKER) {
            return Self::regex(pattern, raw);
        }

        if pattern.starts_with('*') || pattern.ends_with('*') {
            return Self::regex(pattern, &normalize_wildcards(pattern));
        }

        Ok(Self::Suffix(pattern.to_string()))
    }

    fn regex(source: &str, expr: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(expr).map_err(|e| PatternError::new(source, e))?;
        Ok(Self::Regex {
            source: source.to_string(),
            regex,
        })
    }

    pub fn is_match(&self, subject: &str) -> bool {
        match self {
            Self::Suffix(suffix) => subject.ends_with(suffix.as_str()),
            Self::Regex { regex, .. } => regex.is_match(subject),
        }
    }

    /// The pattern string this rule was compiled from.
    pub fn source(&self) -> &str {
        match self {
            Self::Suffix(suffix) => suffix,
            Self::Regex { source, .. } => source,
        }
    }
}

/// Rewrite a leading `*` to `^`, a trailing `*` to `$`, and escape dots.
fn normalize_wildcards(pattern: &str) -> String {
    let mut body = pattern;
    let anchor_start = match body.strip_prefix('*') {
        Some(rest) => {
            body = rest;
            true
        }
        None => false,
    };
    let anchor_end = match body.strip_suffix('*') {
        Some(rest) => {
            body = rest;
            true
        }
        None => false,
    };

    let mut expr = String::with_capacity(body.len() + 8);
    if anchor_start {
        expr.push('^');
    }
    expr.push_str(&body.replace('.', "\\."));
    if anchor_end {
        expr.push('$');
    }
    expr
}
