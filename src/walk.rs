//! Directory traversal
//!
//! Depth-first walk over a directory tree that hands every file passing
//! the inclusion filter (and not the exclusion set) to a visitor as soon
//! as it is found. Directories are always descended; exclusion only
//! filters leaf files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use swagger_merger_filter::PatternSet;
use tracing::debug;
use walkdir::WalkDir;

/// Errors for traversal
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Filtered depth-first directory walker
#[derive(Debug, Clone, Copy)]
pub struct Walker<'a> {
    include: &'a PatternSet,
    exclude: &'a PatternSet,
}

impl<'a> Walker<'a> {
    pub fn new(include: &'a PatternSet, exclude: &'a PatternSet) -> Self {
        Self { include, exclude }
    }

    /// Whether a file path passes both filters
    pub fn accepts(&self, path: &Path) -> bool {
        let subject = path.to_string_lossy();
        if !self.include.is_match(&subject) {
            debug!(path = %path.display(), "skipping, no inclusion pattern matched");
            return false;
        }
        if self.exclude.is_match(&subject) {
            debug!(path = %path.display(), "skipping, excluded");
            return false;
        }
        true
    }

    /// Walk `root`, calling `visit` for each accepted file in discovery
    /// order. Returns the number of files visited.
    ///
    /// The root is made absolute once so every visited path is absolute.
    /// Entries are sorted by file name within each directory. Symlinks are
    /// not followed into directories; a symlink to a file is visited like
    /// a file. The first error from the walk or from `visit` aborts.
    pub fn walk<F, E>(&self, root: &Path, mut visit: F) -> Result<usize, E>
    where
        F: FnMut(&Path) -> Result<(), E>,
        E: From<WalkError>,
    {
        let root = std::path::absolute(root).map_err(|source| WalkError::Io {
            path: root.to_path_buf(),
            source,
        })?;

        let mut visited = 0;
        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(WalkError::from)?;
            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            if !self.accepts(path) {
                continue;
            }

            if file_type.is_symlink() {
                let target = fs::metadata(path).map_err(|source| WalkError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                if target.is_dir() {
                    debug!(path = %path.display(), "skipping symlinked directory");
                    continue;
                }
            }

            visit(path)?;
            visited += 1;
        }

        Ok(visited)
    }
}
