//! Merge run orchestration
//!
//! A [`Merger`] owns the accumulated document for exactly one run. Inputs
//! are folded in as they are discovered; nothing is written until
//! [`run`] has merged every input successfully.

use std::fs;
use std::mem;
use std::path::{Path, PathBuf};

use swagger_merger_filter::PatternSet;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::document::{self, Document};
use crate::error::{Error, Result};
use crate::merge::{kind_conflicts, merge};
use crate::output::{self, OutputFormat};
use crate::walk::Walker;

/// Suffix used for directory inputs when the caller gives no patterns
pub const FALLBACK_SUFFIX: &str = "swagger.json";

/// What to do when a key changes between mapping and non-mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Later value wins; the change is logged
    #[default]
    Overwrite,
    /// Abort the run
    Strict,
}

/// Accumulates input documents for one run
#[derive(Debug)]
pub struct Merger {
    document: Document,
    include: PatternSet,
    exclude: PatternSet,
    policy: ConflictPolicy,
    files_merged: usize,
}

impl Merger {
    /// Create a merger filtering directory inputs with `include`.
    ///
    /// An empty inclusion set falls back to [`FALLBACK_SUFFIX`].
    pub fn new(include: PatternSet) -> Self {
        let include = if include.is_empty() {
            PatternSet::compile([FALLBACK_SUFFIX]).unwrap_or_default()
        } else {
            include
        };

        Self {
            document: Document::new(),
            include,
            exclude: PatternSet::default(),
            policy: ConflictPolicy::default(),
            files_merged: 0,
        }
    }

    /// Skip directory entries matching `exclude`
    pub fn with_excludes(mut self, exclude: PatternSet) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Add a file or directory input.
    ///
    /// Files are merged unconditionally; directories are walked and only
    /// matching files merged. Returns the number of files merged.
    pub fn add_path(&mut self, path: &Path) -> Result<usize> {
        let metadata = fs::metadata(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            self.add_file(path)?;
            return Ok(1);
        }

        let walker = Walker::new(&self.include, &self.exclude);
        walker.walk(path, |file| -> Result<()> {
            let incoming = document::load(file)?;
            fold(&mut self.document, self.policy, file, incoming)?;
            self.files_merged += 1;
            Ok(())
        })
    }

    /// Load one file and merge it
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let path = std::path::absolute(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let incoming = document::load(&path)?;
        self.add_document(&path, incoming)
    }

    /// Merge an already parsed document; `source` is used for reporting
    pub fn add_document(&mut self, source: &Path, incoming: Document) -> Result<()> {
        fold(&mut self.document, self.policy, source, incoming)?;
        self.files_merged += 1;
        Ok(())
    }

    pub fn files_merged(&self) -> usize {
        self.files_merged
    }

    /// The accumulated document so far
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// End the run and hand over the merged document
    pub fn finish(self) -> Document {
        self.document
    }
}

fn fold(
    acc: &mut Document,
    policy: ConflictPolicy,
    source: &Path,
    incoming: Document,
) -> Result<()> {
    info!(path = %source.display(), "add file");

    for conflict in kind_conflicts(acc, &incoming) {
        match policy {
            ConflictPolicy::Strict => {
                return Err(Error::Conflict {
                    path: source.to_path_buf(),
                    conflict,
                });
            }
            ConflictPolicy::Overwrite => {
                warn!(path = %source.display(), key = %conflict.key, "{conflict}, overwriting");
            }
        }
    }

    *acc = merge(mem::take(acc), incoming);
    Ok(())
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files_merged: usize,
    pub output: PathBuf,
    pub format: OutputFormat,
}

/// Merge `inputs` in order and save the result as `settings` describe.
///
/// The output format and patterns are checked before any input is read,
/// and the output is only written once every input merged cleanly.
pub fn run(inputs: &[PathBuf], settings: &Settings) -> Result<RunSummary> {
    if inputs.is_empty() {
        return Err(Error::MissingInput);
    }

    let format = OutputFormat::from_path(&settings.output)?;
    let include = PatternSet::compile(&settings.suffix)?;
    let exclude = PatternSet::compile(&settings.exclude)?;
    debug!(
        sources = ?settings.sources,
        include = ?include.sources(),
        exclude = ?exclude.sources(),
        output = %settings.output.display(),
        %format,
        "resolved settings"
    );

    let policy = if settings.strict {
        ConflictPolicy::Strict
    } else {
        ConflictPolicy::Overwrite
    };

    let mut merger = Merger::new(include)
        .with_excludes(exclude)
        .with_policy(policy);

    for input in inputs {
        merger.add_path(input)?;
    }

    let files_merged = merger.files_merged();
    let document = merger.finish();
    output::save_as(&document, &settings.output, format, settings.beautify)?;

    Ok(RunSummary {
        files_merged,
        output: settings.output.clone(),
        format,
    })
}
