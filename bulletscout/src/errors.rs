/// Error types for bulletscout.
///
/// Only a missing root folder or an invalid configuration is fatal for a
/// search. Page and file failures are recovered where they happen and reported
/// through `tracing` instead of crossing the file-scan boundary.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Root folder not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Failed to open document {path}: {message}")]
    DocumentOpen { path: PathBuf, message: String },
    #[error("Failed to extract page {page} of {path}: {message}")]
    PageExtraction {
        path: PathBuf,
        page: u32,
        message: String,
    },
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Canonicalize the path and strip UNC prefixes so that
/// comparisons on Windows are consistent.
pub fn unify_path(original: &Path) -> PathBuf {
    let canonical = original
        .canonicalize()
        .unwrap_or_else(|_| original.to_path_buf());
    strip_unc_prefix(&canonical)
}

/// Strips the Windows UNC prefix (\\?\) from a path if present
fn strip_unc_prefix(p: &Path) -> PathBuf {
    let s = p.display().to_string();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        p.to_path_buf()
    }
}

impl SearchError {
    pub fn root_not_found(path: impl Into<PathBuf>) -> Self {
        Self::RootNotFound(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn document_open(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DocumentOpen {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn page_extraction(
        path: impl Into<PathBuf>,
        page: u32,
        message: impl Into<String>,
    ) -> Self {
        Self::PageExtraction {
            path: path.into(),
            page,
            message: message.into(),
        }
    }

    /// Maps an I/O error on `path` to the matching variant
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }

    /// Whether this error aborts the whole search invocation
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::RootNotFound(_) | Self::ConfigError(_) | Self::ThreadPool(_)
        )
    }
}
