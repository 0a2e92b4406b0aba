//! Unified error types for voxbatch
//!
//! Error strategy:
//! - Per-file errors (missing file, analysis backend failure): Recoverable,
//!   recorded as a failed outcome and the batch continues
//! - System errors (configuration, report output): Fatal, abort the run
//!
//! All errors include actionable suggestions where possible.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for voxbatch operations
#[derive(Debug, Error)]
pub enum VoxError {
    // =========================================================================
    // Recoverable errors - record a failed outcome, continue batch
    // =========================================================================
    #[error("Analysis failed for '{path}': {reason}")]
    AnalysisError { path: PathBuf, reason: String },

    #[error("Unsupported audio format for '{path}': {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    #[error("File not found: '{0}'\n  Tip: The file may have been moved or deleted during the run")]
    FileNotFound(PathBuf),

    // =========================================================================
    // Fatal errors - abort the run
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Cannot write report to '{path}': {reason}\n  Tip: Check write permissions and free space for the output directory")]
    OutputError { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for voxbatch operations
pub type Result<T> = std::result::Result<T, VoxError>;

impl VoxError {
    /// Returns true if this error only affects a single file
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            VoxError::AnalysisError { .. }
                | VoxError::UnsupportedFormat { .. }
                | VoxError::FileNotFound(_)
        )
    }

    /// Create an analysis error for a file
    pub fn analysis_error(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        VoxError::AnalysisError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error naming the offending item
    pub fn config_error(item: impl Into<String>) -> Self {
        VoxError::ConfigError(item.into())
    }

    /// Create an output error, checking for common issues
    pub fn output_error(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        let reason = match err.kind() {
            std::io::ErrorKind::PermissionDenied => {
                format!("Permission denied. Check that you have write access to {}", path.display())
            }
            std::io::ErrorKind::NotFound => {
                format!(
                    "Directory does not exist: {}",
                    path.parent().map(|p| p.display().to_string()).unwrap_or_default()
                )
            }
            _ => err.to_string(),
        };
        VoxError::OutputError { path, reason }
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    /// Add context to an error about which file was being processed
    fn with_file_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T, E: std::fmt::Display> ErrorContext<T> for std::result::Result<T, E> {
    fn with_file_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|e| VoxError::AnalysisError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}
