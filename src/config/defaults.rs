//! Built-in defaults (layer 1)

use swagger_merger_filter::DEFAULT_SUFFIXES;

/// Output file used when none is configured
pub const DEFAULT_OUTPUT: &str = "swagger.json";

/// Built-in default setting values
#[derive(Debug, Clone)]
pub struct BuiltinDefaults {
    /// Output path (default: swagger.json)
    pub output: String,

    /// Inclusion patterns for directory inputs
    pub suffix: Vec<String>,

    /// Exclusion patterns for directory inputs (default: none)
    pub exclude: Vec<String>,

    /// Indent JSON output (default: false)
    pub beautify: bool,

    /// Fail on mapping/non-mapping collisions (default: false)
    pub strict: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            output: DEFAULT_OUTPUT.to_string(),
            suffix: DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            exclude: Vec::new(),
            beautify: false,
            strict: false,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "output": self.output,
            "suffix": self.suffix,
            "exclude": self.exclude,
            "beautify": self.beautify,
            "strict": self.strict,
        })
    }
}
