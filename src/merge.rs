//! Two-level document merge
//!
//! Merge semantics, later documents winning on every collision:
//! - Mapping values: second-level keys are unioned into the accumulator's
//!   mapping; each second-level value replaces wholesale (no recursion)
//! - Everything else: whole-value replace

use std::fmt;

use serde_json::{Map, Value};

use crate::document::Document;

/// Fold `incoming` into `acc` and return the result.
///
/// A mapping arriving under a key that holds a non-mapping replaces it
/// with a fresh mapping, and a non-mapping replaces a mapping outright.
/// Use [`kind_conflicts`] to detect those cases beforehand.
pub fn merge(mut acc: Document, incoming: Document) -> Document {
    for (key, value) in incoming {
        match value {
            Value::Object(sub_map) => {
                let slot = acc
                    .entry(key)
                    .or_insert_with(|| Value::Object(Map::new()));
                if !slot.is_object() {
                    *slot = Value::Object(Map::new());
                }
                if let Value::Object(target) = slot {
                    for (sub_key, sub_value) in sub_map {
                        target.insert(sub_key, sub_value);
                    }
                }
            }
            other => {
                acc.insert(key, other);
            }
        }
    }
    acc
}

/// Merge documents in order, first is base, last has highest precedence
pub fn merge_all<I>(documents: I) -> Document
where
    I: IntoIterator<Item = Document>,
{
    documents.into_iter().fold(Document::new(), merge)
}

/// Coarse type of a value, for conflict reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "list",
            Self::Object => "mapping",
        };
        f.write_str(name)
    }
}

/// A top-level key where merging swaps a mapping for a non-mapping or back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindConflict {
    pub key: String,
    pub existing: ValueKind,
    pub incoming: ValueKind,
}

impl fmt::Display for KindConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "key '{}' holds a {} but the incoming value is a {}",
            self.key, self.existing, self.incoming
        )
    }
}

/// Keys whose merge would silently change a mapping into a non-mapping
/// (or the reverse).
pub fn kind_conflicts(acc: &Document, incoming: &Document) -> Vec<KindConflict> {
    incoming
        .iter()
        .filter_map(|(key, value)| {
            let existing = acc.get(key)?;
            if existing.is_object() == value.is_object() {
                return None;
            }
            Some(KindConflict {
                key: key.clone(),
                existing: ValueKind::of(existing),
                incoming: ValueKind::of(value),
            })
        })
        .collect()
}
