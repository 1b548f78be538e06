//! swagger-merger - combine split OpenAPI/Swagger documents
//!
//! Inputs (files, or directories walked for matching files) are parsed as
//! YAML or JSON and folded into one document with a shallow two-level
//! merge, then written as JSON or YAML depending on the output extension.

pub mod config;
pub mod document;
pub mod error;
pub mod merge;
pub mod merger;
pub mod output;
pub mod walk;

pub use config::{ConfigError, Settings};
pub use document::{Document, LoadError};
pub use error::{Error, Result};
pub use merge::{kind_conflicts, merge, merge_all, KindConflict, ValueKind};
pub use merger::{run, ConflictPolicy, Merger, RunSummary};
pub use output::{save, OutputFormat, SaveError};
pub use swagger_merger_filter::{PatternError, PatternSet};
pub use walk::{WalkError, Walker};
