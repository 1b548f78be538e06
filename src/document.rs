//! Document loading
//!
//! Reads one API description file and parses it into a [`Document`].
//! YAML is a superset of JSON, so every input goes through `serde_yaml`
//! and is then converted into the `serde_json` tree the rest of the
//! crate works with.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};

/// A parsed API description: the top-level mapping of a file.
pub type Document = Map<String, Value>;

/// Errors while loading a single input file
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to decode {path} as UTF-8: {source}")]
    Encoding {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("{path}: {reason}")]
    Schema { path: PathBuf, reason: String },
}

/// Read and parse a file into a document.
pub fn load(path: &Path) -> Result<Document, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = std::str::from_utf8(&bytes).map_err(|source| LoadError::Encoding {
        path: path.to_path_buf(),
        source,
    })?;

    parse(content).map_err(|e| e.at(path))
}

/// Parse YAML or JSON text into a document.
///
/// Errors carry an empty path; [`load`] fills it in.
pub fn parse(content: &str) -> Result<Document, LoadError> {
    let value = match serde_yaml::from_str::<serde_yaml::Value>(content) {
        Ok(mut yaml) => {
            yaml.apply_merge().map_err(|source| LoadError::Parse {
                path: PathBuf::new(),
                source,
            })?;
            yaml_to_json(yaml)?
        }
        // Tab-indented JSON is valid JSON but not valid YAML.
        Err(source) => serde_json::from_str(content).map_err(|_| LoadError::Parse {
            path: PathBuf::new(),
            source,
        })?,
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(LoadError::Schema {
            path: PathBuf::new(),
            reason: "top-level document must be an object".to_string(),
        }),
    }
}

impl LoadError {
    fn at(self, at: &Path) -> Self {
        match self {
            Self::Io { source, .. } => Self::Io {
                path: at.to_path_buf(),
                source,
            },
            Self::Parse { source, .. } => Self::Parse {
                path: at.to_path_buf(),
                source,
            },
            Self::Encoding { source, .. } => Self::Encoding {
                path: at.to_path_buf(),
                source,
            },
            Self::Schema { reason, .. } => Self::Schema {
                path: at.to_path_buf(),
                reason,
            },
        }
    }
}

/// Convert a YAML value to a JSON value.
///
/// Scalar mapping keys are stringified (`200:` becomes `"200"`), tags are
/// dropped, and non-finite floats become null.
fn yaml_to_json(yaml: serde_yaml::Value) -> Result<Value, LoadError> {
    Ok(match yaml {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n),
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut map = Map::with_capacity(mapping.len());
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Value {
    if let Some(u) = n.as_u64() {
        Value::Number(u.into())
    } else if let Some(i) = n.as_i64() {
        Value::Number(i.into())
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, LoadError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Tagged(tagged) => yaml_key(tagged.value),
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err(LoadError::Schema {
                path: PathBuf::new(),
                reason: "mapping keys must be scalars".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_parse_json() {
        let doc = parse(r#"{"swagger": "2.0", "paths": {"/pets": {"get": {}}}}"#).unwrap();
        assert_eq!(doc["swagger"], "2.0");
        assert_eq!(doc["paths"]["/pets"], json!({"get": {}}));
    }

    #[test]
    fn test_parse_yaml() {
        let doc = parse(
            "openapi: 3.0.0\ninfo:\n  title: Pets\n  version: '1'\ntags:\n  - pets\n  - store\n",
        )
        .unwrap();
        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(doc["info"]["title"], "Pets");
        assert_eq!(doc["tags"], json!(["pets", "store"]));
    }

    #[test]
    fn test_numeric_keys_become_strings() {
        let doc = parse("responses:\n  200:\n    description: ok\n  404:\n    description: gone\n")
            .unwrap();
        assert_eq!(doc["responses"]["200"]["description"], "ok");
        assert_eq!(doc["responses"]["404"]["description"], "gone");
    }

    #[test]
    fn test_key_order_preserved() {
        let doc = parse("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_scalar_types() {
        let doc = parse("a: 1\nb: -2\nc: 1.5\nd: true\ne: null\nf: .nan\n").unwrap();
        assert_eq!(doc["a"], json!(1));
        assert_eq!(doc["b"], json!(-2));
        assert_eq!(doc["c"], json!(1.5));
        assert_eq!(doc["d"], json!(true));
        assert!(doc["e"].is_null());
        assert!(doc["f"].is_null());
    }

    #[test]
    fn test_tagged_value_unwrapped() {
        let doc = parse("a: !custom hello\n").unwrap();
        assert_eq!(doc["a"], "hello");
    }

    #[test]
    fn test_top_level_list_is_schema_error() {
        let err = parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, LoadError::Schema { .. }));
        assert!(err.to_string().contains("top-level document must be an object"));
    }

    #[test]
    fn test_top_level_scalar_is_schema_error() {
        assert!(matches!(parse("42"), Err(LoadError::Schema { .. })));
        assert!(matches!(parse(""), Err(LoadError::Schema { .. })));
    }

    #[test]
    fn test_complex_key_is_schema_error() {
        let err = parse("? [a, b]\n: value\n").unwrap_err();
        assert!(matches!(err, LoadError::Schema { .. }));
    }

    #[test]
    fn test_merge_keys_applied() {
        let doc = parse("base: &b\n  type: object\nschema:\n  <<: *b\n  title: Pet\n").unwrap();
        assert_eq!(doc["schema"], json!({"type": "object", "title": "Pet"}));
    }

    #[test]
    fn test_nested_merge_keys_applied() {
        let doc = parse(
            "definitions:\n  Base: &base\n    type: object\n    required: [id]\n  Pet:\n    <<: *base\n    required: [id, name]\n",
        )
        .unwrap();
        assert_eq!(
            doc["definitions"]["Pet"],
            json!({"type": "object", "required": ["id", "name"]})
        );
    }

    #[test]
    fn test_merge_key_on_scalar_is_parse_error() {
        let err = parse("a:\n  <<: 3\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_tab_indented_json() {
        let doc = parse("{\n\t\"paths\": {\n\t\t\"/pets\": {}\n\t}\n}\n").unwrap();
        assert_eq!(doc["paths"], json!({"/pets": {}}));
    }

    #[test]
    fn test_invalid_syntax_is_parse_error() {
        let err = parse("{\"a\": [1, 2}").unwrap_err();
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn test_load_attaches_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.swagger.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        let err = load(&path).unwrap_err();
        match &err {
            LoadError::Schema { path: p, .. } => assert_eq!(p, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("bad.swagger.json"));
    }

    #[test]
    fn test_load_invalid_utf8_is_encoding_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.swagger.json");
        std::fs::write(&path, [0x7b, 0xff, 0xfe, 0x7d]).unwrap();

        let err = load(&path).unwrap_err();
        match &err {
            LoadError::Encoding { path: p, .. } => assert_eq!(p, &path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("UTF-8"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
