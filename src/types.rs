//! Core data types for voxbatch
//!
//! These types represent the domain model and flow through the pipeline.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Input files
// =============================================================================

/// A discovered audio file
///
/// Created once per matching file during discovery and never modified
/// afterwards. Outcomes share it through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File name including extension (never empty)
    pub name: String,
    /// Size in bytes, `None` if the metadata could not be read
    pub size_bytes: Option<u64>,
    /// Lower-cased extension without the leading dot
    pub format: String,
}

impl AudioFileRecord {
    /// Build a record from a path, deriving name and format from it
    pub fn from_path(path: impl Into<PathBuf>, size_bytes: Option<u64>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| path.to_string_lossy().to_string());
        let format = format_tag(&path);

        Self {
            path,
            name,
            size_bytes,
            format,
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.name.clone())
    }

    /// Size in MiB rounded to two decimals
    pub fn size_mb(&self) -> Option<f64> {
        self.size_bytes
            .map(|b| (b as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0)
    }
}

/// Lower-cased extension of a path without the separator
pub fn format_tag(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of analyzing one [`AudioFileRecord`]
///
/// Fields are private so that a successful outcome never carries an error
/// message and a failed one always does.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    record: Arc<AudioFileRecord>,
    result_text: String,
    success: bool,
    error_message: Option<String>,
    elapsed: Duration,
    timestamp: DateTime<Utc>,
    output_path: Option<PathBuf>,
}

impl AnalysisOutcome {
    /// Outcome of an analysis that returned text
    pub fn succeeded(record: Arc<AudioFileRecord>, result_text: String, elapsed: Duration) -> Self {
        Self {
            record,
            result_text,
            success: true,
            error_message: None,
            elapsed,
            timestamp: Utc::now(),
            output_path: None,
        }
    }

    /// Outcome of an analysis that failed
    pub fn failed(record: Arc<AudioFileRecord>, error_message: String, elapsed: Duration) -> Self {
        Self {
            record,
            result_text: String::new(),
            success: false,
            error_message: Some(error_message),
            elapsed,
            timestamp: Utc::now(),
            output_path: None,
        }
    }

    pub fn record(&self) -> &AudioFileRecord {
        &self.record
    }

    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Path of the written report, set by the persister
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    /// Record where the per-file report was written
    pub fn set_output_path(&mut self, path: PathBuf) {
        self.output_path = Some(path);
    }

    /// Number of whitespace-separated words in the result text
    pub fn word_count(&self) -> usize {
        self.result_text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_derives_name_and_format() {
        let record = AudioFileRecord::from_path("/calls/2024/Support_Call.MP3", Some(2048));
        assert_eq!(record.name, "Support_Call.MP3");
        assert_eq!(record.format, "mp3");
        assert_eq!(record.stem(), "Support_Call");
    }

    #[test]
    fn test_record_without_extension() {
        let record = AudioFileRecord::from_path("/calls/raw", None);
        assert_eq!(record.format, "");
        assert_eq!(record.name, "raw");
        assert_eq!(record.size_mb(), None);
    }

    #[test]
    fn test_size_mb_rounding() {
        let record = AudioFileRecord::from_path("/a.wav", Some(1_572_864));
        assert_eq!(record.size_mb(), Some(1.5));
    }

    #[test]
    fn test_outcome_invariants() {
        let record = Arc::new(AudioFileRecord::from_path("/a.wav", None));
        let ok = AnalysisOutcome::succeeded(record.clone(), "hello there".into(), Duration::ZERO);
        assert!(ok.is_success());
        assert!(ok.error_message().is_none());
        assert_eq!(ok.word_count(), 2);

        let bad = AnalysisOutcome::failed(record, "boom".into(), Duration::from_millis(5));
        assert!(!bad.is_success());
        assert_eq!(bad.error_message(), Some("boom"));
        assert!(bad.result_text().is_empty());
        assert!(bad.output_path().is_none());
    }
}
