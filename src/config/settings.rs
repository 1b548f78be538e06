//! Effective run settings with provenance

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::defaults::BuiltinDefaults;
use super::merge::merge_layers;

/// File name of the per-user config in $HOME
pub const USER_CONFIG_FILE: &str = ".swagger-merger.toml";

/// Origin of a settings layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    Builtin,
    User,
    File,
    Cli,
}

/// A contributing layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// File path (None for builtin/cli)
    pub path: Option<PathBuf>,
}

/// Shape every merged layer must deserialize into
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    output: String,
    suffix: Vec<String>,
    exclude: Vec<String>,
    beautify: bool,
    strict: bool,
}

/// Settings for one merge run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Where the merged document is written
    pub output: PathBuf,

    /// Inclusion patterns for directory inputs
    pub suffix: Vec<String>,

    /// Exclusion patterns for directory inputs
    pub exclude: Vec<String>,

    /// Indent JSON output
    pub beautify: bool,

    /// Treat mapping/non-mapping collisions as errors
    pub strict: bool,

    /// Contributing layers in precedence order
    pub sources: Vec<ConfigSource>,
}

impl Settings {
    /// Build settings from all layers.
    ///
    /// `user_path` is skipped when the file does not exist; `file_path`
    /// was asked for explicitly and must exist. `overrides` carries the
    /// command-line layer; null or missing keys leave lower layers alone.
    pub fn build(
        user_path: Option<&Path>,
        file_path: Option<&Path>,
        overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource {
            origin: ConfigOrigin::Builtin,
            path: None,
        }];

        if let Some(path) = user_path.filter(|p| p.is_file()) {
            layers.push(load_toml_file(path)?);
            sources.push(ConfigSource {
                origin: ConfigOrigin::User,
                path: Some(path.to_path_buf()),
            });
        }

        if let Some(path) = file_path {
            layers.push(load_toml_file(path)?);
            sources.push(ConfigSource {
                origin: ConfigOrigin::File,
                path: Some(path.to_path_buf()),
            });
        }

        if let Some(cli) = overrides {
            layers.push(cli);
            sources.push(ConfigSource {
                origin: ConfigOrigin::Cli,
                path: None,
            });
        }

        let merged = merge_layers(layers);
        let raw: RawSettings = serde_json::from_value(merged)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;

        if raw.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output must not be empty".to_string(),
            ));
        }

        Ok(Self {
            output: PathBuf::from(raw.output),
            suffix: raw.suffix,
            exclude: raw.exclude,
            beautify: raw.beautify,
            strict: raw.strict,
            sources,
        })
    }
}

/// Default user config location, if $HOME is set
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(USER_CONFIG_FILE))
}

/// Load and parse a TOML file into a JSON value
fn load_toml_file(path: &Path) -> Result<Value, ConfigError> {
    debug!(path = %path.display(), "loading config file");

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let table: toml::Table = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("failed to parse config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid settings: {0}")]
    Validation(String),
}
