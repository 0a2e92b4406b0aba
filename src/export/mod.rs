//! Report export
//!
//! Artifact layout, for every format:
//!
//! ```text
//! <output-dir>/<file-stem>_analysis.<ext>   one per input file
//! <output-dir>/summary_report.<ext>         one per batch
//! ```
//!
//! Existing artifacts are replaced entirely. Writes go through a temporary
//! file and a rename, so a failed write never leaves a partial report.

pub mod json;
pub mod markdown;

pub use json::JsonReportWriter;
pub use markdown::MarkdownReportWriter;

use crate::error::{Result, VoxError};
use crate::pipeline::BatchSummary;
use crate::types::{AnalysisOutcome, AudioFileRecord};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Base name of the summary artifact
pub const SUMMARY_STEM: &str = "summary_report";

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Markdown,
    Json,
}

/// Writes per-file and summary artifacts
pub trait ReportPersister {
    /// Write the report for one outcome to `path` and record the path on the outcome
    fn save_outcome_to(&self, outcome: &mut AnalysisOutcome, path: &Path) -> Result<()>;

    /// Write the report for one outcome under its default name in `output_dir`
    fn save_outcome(&self, outcome: &mut AnalysisOutcome, output_dir: &Path) -> Result<PathBuf> {
        let path = outcome_path(output_dir, outcome.record(), self.extension());
        self.save_outcome_to(outcome, &path)?;
        Ok(path)
    }

    /// Write the batch summary
    fn save_summary(
        &self,
        outcomes: &[AnalysisOutcome],
        summary: &BatchSummary,
        output_dir: &Path,
    ) -> Result<PathBuf>;

    /// File extension of the artifacts, without the dot
    fn extension(&self) -> &'static str;
}

/// Get the persister for a report format
pub fn persister_for(format: ReportFormat) -> Box<dyn ReportPersister> {
    match format {
        ReportFormat::Markdown => Box::new(MarkdownReportWriter),
        ReportFormat::Json => Box::new(JsonReportWriter),
    }
}

/// Path of the per-file artifact for a record
pub fn outcome_path(output_dir: &Path, record: &AudioFileRecord, ext: &str) -> PathBuf {
    output_dir.join(format!("{}_analysis.{}", record.stem(), ext))
}

/// Distinct artifact paths for a batch, in record order
///
/// A record gets `<stem>_analysis.<ext>` unless an earlier record already
/// took that name (compared case-insensitively). It then gets its format tag
/// appended to the stem, plus a counter if that name is taken as well.
pub fn outcome_paths<'a>(
    output_dir: &Path,
    records: impl IntoIterator<Item = &'a AudioFileRecord>,
    ext: &str,
) -> Vec<PathBuf> {
    let mut taken = HashSet::new();
    records
        .into_iter()
        .map(|record| {
            let stem = record.stem();
            let mut name = stem.clone();
            if taken.contains(&name.to_lowercase()) && !record.format.is_empty() {
                name = format!("{}_{}", stem, record.format);
            }
            let base = name.clone();
            let mut counter = 2;
            while taken.contains(&name.to_lowercase()) {
                name = format!("{}_{}", base, counter);
                counter += 1;
            }
            if name != stem {
                warn!(
                    "Report name for {} is already used in this batch, writing {}_analysis.{}",
                    record.path.display(),
                    name,
                    ext
                );
            }
            taken.insert(name.to_lowercase());
            output_dir.join(format!("{}_analysis.{}", name, ext))
        })
        .collect()
}

/// Path of the summary artifact
pub fn summary_path(output_dir: &Path, ext: &str) -> PathBuf {
    output_dir.join(format!("{}.{}", SUMMARY_STEM, ext))
}

/// Create the output directory and any missing parents
pub fn ensure_output_dir(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir).map_err(|e| VoxError::output_error(output_dir, e))
}

/// Replace the content of `path` with `contents`
///
/// Uses atomic write pattern: writes to a temp file first, then renames.
pub fn write_artifact(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_output_dir(parent)?;
        }
    }

    // Temp file in same directory (ensures same filesystem for atomic rename)
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name));

    let write_temp = || -> std::io::Result<()> {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()
    };

    if let Err(e) = write_temp() {
        // Clean up temp file on error
        let _ = fs::remove_file(&temp_path);
        return Err(VoxError::output_error(path, e));
    }

    // Atomic rename: either succeeds completely or fails without modifying target
    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        VoxError::OutputError {
            path: path.to_path_buf(),
            reason: format!("Failed to finalize file: {}", e),
        }
    })?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Shared body of `save_outcome_to` for every format
pub(crate) fn save_outcome_with(
    outcome: &mut AnalysisOutcome,
    path: &Path,
    render: impl FnOnce(&AnalysisOutcome) -> Result<Vec<u8>>,
) -> Result<()> {
    let contents = render(&*outcome)?;
    write_artifact(path, &contents)?;
    outcome.set_output_path(path.to_path_buf());
    info!("Saved report for {} to {}", outcome.record().name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_artifact_names() {
        let record = AudioFileRecord::from_path("/in/call.01.MP3", None);
        let dir = Path::new("/out");
        assert_eq!(outcome_path(dir, &record, "md"), PathBuf::from("/out/call.01_analysis.md"));
        assert_eq!(summary_path(dir, "json"), PathBuf::from("/out/summary_report.json"));
    }

    #[test]
    fn test_outcome_paths_keep_unique_stems() {
        let records = [
            AudioFileRecord::from_path("/in/a.mp3", None),
            AudioFileRecord::from_path("/in/b.wav", None),
        ];
        let paths = outcome_paths(Path::new("/out"), &records, "md");
        assert_eq!(
            paths,
            vec![PathBuf::from("/out/a_analysis.md"), PathBuf::from("/out/b_analysis.md")]
        );
    }

    #[test]
    fn test_outcome_paths_disambiguate_shared_stems() {
        let records = [
            AudioFileRecord::from_path("/in/call.wav", None),
            AudioFileRecord::from_path("/in/monday/call.mp3", None),
            AudioFileRecord::from_path("/in/tuesday/call.mp3", None),
            AudioFileRecord::from_path("/in/wednesday/CALL.mp3", None),
            AudioFileRecord::from_path("/in/call_mp3.flac", None),
        ];
        let names: Vec<_> = outcome_paths(Path::new("/out"), &records, "json")
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "call_analysis.json",
                "call_mp3_analysis.json",
                "call_mp3_2_analysis.json",
                "CALL_mp3_3_analysis.json",
                "call_mp3_flac_analysis.json",
            ]
        );
    }

    #[test]
    fn test_write_artifact_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/report.md");
        write_artifact(&path, b"a much longer first version").unwrap();
        write_artifact(&path, b"short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
        let entries: Vec<_> = fs::read_dir(dir.path().join("nested")).unwrap().collect();
        assert_eq!(entries.len(), 1, "temp file should not remain");
    }

    #[test]
    fn test_write_artifact_into_file_path_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"x").unwrap();

        let err = write_artifact(&blocker.join("report.md"), b"data").unwrap_err();
        assert!(matches!(err, VoxError::OutputError { .. }));
    }

    #[test]
    fn test_ensure_output_dir_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("a/b/c");
        ensure_output_dir(&out).unwrap();
        ensure_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }
}
