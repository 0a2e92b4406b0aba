//! JSON export for interoperability with other tools

use super::{save_outcome_with, summary_path, write_artifact, ReportPersister};
use crate::error::{Result, VoxError};
use crate::pipeline::BatchSummary;
use crate::types::AnalysisOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// JSON output schema version
const SCHEMA_VERSION: &str = "1.0";

/// Writes `.json` reports
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReportWriter;

/// Per-file report document
#[derive(Debug, Serialize, Deserialize)]
pub struct OutcomeReport {
    /// Schema version for forward compatibility
    pub version: String,
    /// voxbatch version that generated this file
    pub generator_version: String,
    #[serde(flatten)]
    pub outcome: OutcomeJson,
}

/// JSON representation of one outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeJson {
    pub file_name: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    pub format: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub result_text: String,
    pub elapsed_secs: f64,
    /// Timestamp of the analysis attempt (RFC 3339)
    pub analyzed_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

/// Summary report document
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub version: &'static str,
    pub generator_version: &'static str,
    pub exported_at: String,
    pub summary: &'a BatchSummary,
    pub files: Vec<OutcomeJson>,
}

impl ReportPersister for JsonReportWriter {
    fn save_outcome_to(&self, outcome: &mut AnalysisOutcome, path: &Path) -> Result<()> {
        save_outcome_with(outcome, path, |o| {
            let report = OutcomeReport {
                version: SCHEMA_VERSION.to_string(),
                generator_version: env!("CARGO_PKG_VERSION").to_string(),
                outcome: outcome_to_json(o),
            };
            to_pretty_bytes(&report, &o.record().path)
        })
    }

    fn save_summary(
        &self,
        outcomes: &[AnalysisOutcome],
        summary: &BatchSummary,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let path = summary_path(output_dir, self.extension());
        let report = SummaryReport {
            version: SCHEMA_VERSION,
            generator_version: env!("CARGO_PKG_VERSION"),
            exported_at: chrono::Utc::now().to_rfc3339(),
            summary,
            files: outcomes.iter().map(outcome_to_json).collect(),
        };
        let contents = to_pretty_bytes(&report, &path)?;
        write_artifact(&path, &contents)?;
        info!("Wrote summary of {} files to {}", outcomes.len(), path.display());
        Ok(path)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

fn to_pretty_bytes<T: Serialize>(value: &T, path: &Path) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| VoxError::OutputError {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn outcome_to_json(outcome: &AnalysisOutcome) -> OutcomeJson {
    let record = outcome.record();
    OutcomeJson {
        file_name: record.name.clone(),
        path: record.path.to_string_lossy().to_string(),
        size_bytes: record.size_bytes,
        format: record.format.clone(),
        success: outcome.is_success(),
        error: outcome.error_message().map(str::to_string),
        result_text: outcome.result_text().to_string(),
        elapsed_secs: outcome.elapsed().as_secs_f64(),
        analyzed_at: outcome.timestamp().to_rfc3339(),
        report_path: outcome
            .output_path()
            .map(|p| p.to_string_lossy().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFileRecord;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_outcome_report_fields() {
        let dir = TempDir::new().unwrap();
        let record = Arc::new(AudioFileRecord::from_path("/in/call.ogg", None));
        let mut outcome = AnalysisOutcome::failed(record, "boom".into(), Duration::from_millis(250));

        let path = JsonReportWriter.save_outcome(&mut outcome, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("call_analysis.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["version"], SCHEMA_VERSION);
        assert_eq!(json["file_name"], "call.ogg");
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "boom");
        assert!(json.get("size_bytes").is_none());
    }

    #[test]
    fn test_summary_report_fields() {
        let dir = TempDir::new().unwrap();
        let record = Arc::new(AudioFileRecord::from_path("/in/a.mp3", Some(10)));
        let outcomes = vec![AnalysisOutcome::succeeded(record, "hi".into(), Duration::from_secs(1))];
        let summary = BatchSummary::from_outcomes(&outcomes);

        let path = JsonReportWriter
            .save_summary(&outcomes, &summary, dir.path())
            .unwrap();
        assert_eq!(path, dir.path().join("summary_report.json"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["summary"]["total"], 1);
        assert_eq!(json["summary"]["success_rate"], 100.0);
        assert_eq!(json["summary"]["health"], "healthy");
        assert_eq!(json["files"].as_array().unwrap().len(), 1);
    }
}
