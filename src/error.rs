//! Top-level error type for a merge run

use std::io;
use std::path::PathBuf;

use swagger_merger_filter::PatternError;

use crate::config::ConfigError;
use crate::document::LoadError;
use crate::merge::KindConflict;
use crate::output::SaveError;
use crate::walk::WalkError;

/// Errors that abort a merge run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing input files")]
    MissingInput,

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("failed to stat {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("conflicting value kinds in {path}: {conflict}")]
    Conflict {
        path: PathBuf,
        conflict: KindConflict,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
