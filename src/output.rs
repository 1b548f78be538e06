//! Output serialization
//!
//! Renders the merged document as JSON (compact or indented) or YAML,
//! chosen by the output file extension, and writes it atomically.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::document::Document;

/// Errors for saving the merged document
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("unsupported output format '{extension}' for {path} (expected json, json5, yaml or yml)")]
    Format { path: PathBuf, extension: String },

    #[error("failed to encode {format}: {message}")]
    Encode {
        format: OutputFormat,
        message: String,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl OutputFormat {
    /// Resolve the format from the path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, SaveError> {
        let extension = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            // `Path::extension` sees a bare `.json` as a dotfile with no extension.
            None => path
                .file_name()
                .and_then(|name| {
                    name.to_string_lossy()
                        .strip_prefix('.')
                        .map(str::to_lowercase)
                })
                .unwrap_or_default(),
        };

        match extension.as_str() {
            "json" | "json5" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(SaveError::Format {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    /// Encode a document. `beautify` only affects JSON.
    pub fn encode(self, document: &Document, beautify: bool) -> Result<Vec<u8>, SaveError> {
        let encode_err = |message: String| SaveError::Encode {
            format: self,
            message,
        };

        match self {
            Self::Json if beautify => {
                let mut bytes =
                    serde_json::to_vec_pretty(document).map_err(|e| encode_err(e.to_string()))?;
                bytes.push(b'\n');
                Ok(bytes)
            }
            Self::Json => serde_json::to_vec(document).map_err(|e| encode_err(e.to_string())),
            Self::Yaml => serde_yaml::to_string(document)
                .map(String::into_bytes)
                .map_err(|e| encode_err(e.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Yaml => f.write_str("yaml"),
        }
    }
}

/// Encode `document` for `path` and write it.
pub fn save(document: &Document, path: &Path, beautify: bool) -> Result<(), SaveError> {
    let format = OutputFormat::from_path(path)?;
    save_as(document, path, format, beautify)
}

/// Write with an already resolved format.
pub fn save_as(
    document: &Document,
    path: &Path,
    format: OutputFormat,
    beautify: bool,
) -> Result<(), SaveError> {
    let bytes = format.encode(document, beautify)?;
    atomic_write(path, &bytes)?;
    info!(path = %path.display(), %format, bytes = bytes.len(), "saved merged document");
    Ok(())
}

/// Atomic write using write-then-rename
///
/// The temp file is created beside the destination under a unique name.
/// A symlinked destination is written through to its target, and an
/// existing destination keeps its permissions.
fn atomic_write(path: &Path, content: &[u8]) -> Result<(), SaveError> {
    let write_err = |source: io::Error| SaveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let target = match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => resolve_link(path).map_err(write_err)?,
        _ => path.to_path_buf(),
    };
    let file_name = target
        .file_name()
        .ok_or_else(|| write_err(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?;
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name.to_string_lossy()))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_err)?;
    temp.write_all(content).map_err(write_err)?;
    if let Some(permissions) = output_permissions(&target) {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(write_err)?;
    }
    temp.persist(&target).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Permissions for the written file: the existing file's, or the usual
/// 0644 instead of the temp file's private 0600.
fn output_permissions(target: &Path) -> Option<fs::Permissions> {
    if let Ok(existing) = fs::metadata(target) {
        return Some(existing.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

/// Final destination of a symlink, even when it does not exist yet
fn resolve_link(path: &Path) -> io::Result<PathBuf> {
    if let Ok(canonical) = fs::canonicalize(path) {
        return Ok(canonical);
    }
    let link = fs::read_link(path)?;
    Ok(match path.parent() {
        Some(parent) if link.is_relative() => parent.join(link),
        _ => link,
    })
}
