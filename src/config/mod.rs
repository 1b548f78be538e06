//! Layered run settings
//!
//! Settings are merged from, lowest precedence first:
//! 1. Built-in defaults
//! 2. User config (~/.swagger-merger.toml)
//! 3. Config file named with --config
//! 4. Command-line flags and their SWAGGER_MERGER_* environment fallbacks

mod defaults;
mod merge;
mod settings;

pub use defaults::BuiltinDefaults;
pub use merge::{merge_layers, overlay};
pub use settings::{user_config_path, ConfigError, ConfigOrigin, ConfigSource, Settings};
