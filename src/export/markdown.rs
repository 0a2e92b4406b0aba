//! Markdown reports for reading by people

use super::{outcome_path, save_outcome_with, summary_path, write_artifact, ReportPersister};
use crate::error::Result;
use crate::pipeline::{BatchHealth, BatchSummary};
use crate::types::AnalysisOutcome;
use chrono::Utc;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Writes `.md` reports
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownReportWriter;

impl ReportPersister for MarkdownReportWriter {
    fn save_outcome_to(&self, outcome: &mut AnalysisOutcome, path: &Path) -> Result<()> {
        save_outcome_with(outcome, path, |o| Ok(render_outcome(o).into_bytes()))
    }

    fn save_summary(
        &self,
        outcomes: &[AnalysisOutcome],
        summary: &BatchSummary,
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let path = summary_path(output_dir, self.extension());
        write_artifact(&path, render_summary(outcomes, summary).as_bytes())?;
        info!("Saved summary report to {}", path.display());
        Ok(path)
    }

    fn extension(&self) -> &'static str {
        "md"
    }
}

/// Render the report for a single file
pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    let record = outcome.record();
    let mut md = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(md, "# Audio Analysis Report\n");
    let _ = writeln!(md, "## File\n");
    let _ = writeln!(md, "| Property | Value |");
    let _ = writeln!(md, "|----------|-------|");
    let _ = writeln!(md, "| **Name** | `{}` |", record.name);
    let _ = writeln!(md, "| **Path** | `{}` |", record.path.display());
    let _ = writeln!(md, "| **Size** | {} |", format_size(record.size_bytes));
    let _ = writeln!(md, "| **Format** | {} |", record.format.to_uppercase());
    let _ = writeln!(md, "| **Analyzed at** | {} |", outcome.timestamp().format(TIME_FORMAT));
    let _ = writeln!(md, "\n---\n");

    let _ = writeln!(md, "## Status\n");
    let status = if outcome.is_success() { "✅ Succeeded" } else { "❌ Failed" };
    let _ = writeln!(md, "- **Status:** {}", status);
    let _ = writeln!(md, "- **Processing time:** {:.2}s", outcome.elapsed().as_secs_f64());
    let _ = writeln!(md, "\n---\n");

    let _ = writeln!(md, "## Analysis\n");
    match outcome.error_message() {
        None => {
            let _ = writeln!(md, "{}", outcome.result_text().trim_end());
        }
        Some(error) => {
            let _ = writeln!(md, "The file could not be analyzed:\n");
            let _ = writeln!(md, "```\n{}\n```", error);
        }
    }

    let _ = writeln!(md, "\n---\n");
    let _ = writeln!(md, "*Generated by voxbatch {}*", env!("CARGO_PKG_VERSION"));
    md
}

/// Render the batch summary
pub fn render_summary(outcomes: &[AnalysisOutcome], summary: &BatchSummary) -> String {
    let now = Utc::now().format(TIME_FORMAT);
    let mut md = String::new();

    let _ = writeln!(md, "# Batch Summary Report\n");
    let _ = writeln!(md, "**Generated:** {}\n", now);

    if outcomes.is_empty() {
        let _ = writeln!(md, "### ⚠️ No files were found for processing\n");
        let _ = writeln!(md, "Possible causes:");
        let _ = writeln!(md, "- The input directory is empty or does not exist");
        let _ = writeln!(md, "- No file has a supported extension");
        let _ = writeln!(md, "- The files are not readable");
        let _ = writeln!(md, "\n---\n");
        let _ = writeln!(md, "*Generated by voxbatch {}*", env!("CARGO_PKG_VERSION"));
        return md;
    }

    let _ = writeln!(
        md,
        "### {} Status: {}\n",
        health_icon(summary.health),
        summary.health.label()
    );
    let _ = writeln!(md, "---\n");

    let _ = writeln!(md, "## Overview\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|--------|-------|");
    let _ = writeln!(md, "| **Total files** | {} |", summary.total);
    let _ = writeln!(md, "| **Succeeded** | {} ✅ |", summary.successful);
    let _ = writeln!(md, "| **Failed** | {} ❌ |", summary.failed);
    let _ = writeln!(md, "| **Success rate** | {:.1}% |", summary.success_rate);
    let _ = writeln!(md, "| **Total time** | {:.2}s |", summary.total_elapsed_secs);
    let _ = writeln!(md, "| **Mean time** | {:.2}s |", summary.mean_elapsed_secs);
    let _ = writeln!(md, "\n## Content\n");
    let _ = writeln!(md, "| Metric | Value |");
    let _ = writeln!(md, "|--------|-------|");
    let _ = writeln!(md, "| **Total words** | {} |", summary.total_words);
    let _ = writeln!(md, "| **Mean words per file** | {:.0} |", summary.mean_words);
    let _ = writeln!(md, "| **Total input size** | {} |", format_size(Some(summary.total_bytes)));

    let _ = writeln!(md, "\n## Processing speed\n");
    let _ = writeln!(md, "| Speed | Files | Share |");
    let _ = writeln!(md, "|-------|-------|-------|");
    for (label, count) in [
        ("🟢 Fast (< 10s)", summary.speed.fast),
        ("🟡 Medium (10-30s)", summary.speed.medium),
        ("🔴 Slow (>= 30s)", summary.speed.slow),
    ] {
        let _ = writeln!(md, "| {} | {} | {:.1}% |", label, count, summary.speed_share(count));
    }

    let _ = writeln!(md, "\n## Files\n");
    let _ = writeln!(md, "| # | File | Status | Time | Size | Report |");
    let _ = writeln!(md, "|---|------|--------|------|------|--------|");
    for (i, outcome) in outcomes.iter().enumerate() {
        let record = outcome.record();
        let status = if outcome.is_success() { "✅" } else { "❌" };
        let report = outcome
            .output_path()
            .map(PathBuf::from)
            .unwrap_or_else(|| outcome_path(Path::new(""), record, "md"));
        let report_name = report
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let _ = writeln!(
            md,
            "| {} | `{}` | {} | {:.1}s | {} | [view]({}) |",
            i + 1,
            record.name,
            status,
            outcome.elapsed().as_secs_f64(),
            format_size(record.size_bytes),
            report_name
        );
    }

    let failures: Vec<_> = outcomes.iter().filter_map(|o| o.error_message()).collect();
    if !failures.is_empty() {
        let _ = writeln!(md, "\n## Failures\n");
        for error in failures {
            let _ = writeln!(md, "- {}", error.replace('\n', " "));
        }
    }

    let _ = writeln!(md, "\n---\n");
    let _ = writeln!(md, "*Generated by voxbatch {}*", env!("CARGO_PKG_VERSION"));
    md
}

fn health_icon(health: BatchHealth) -> &'static str {
    match health {
        BatchHealth::Idle => "⚪",
        BatchHealth::Healthy => "🟢",
        BatchHealth::Degraded => "🟡",
        BatchHealth::Failing => "🔴",
    }
}

fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None => "unknown".to_string(),
        Some(b) if b >= 1024 * 1024 => format!("{:.2} MB", b as f64 / (1024.0 * 1024.0)),
        Some(b) => format!("{:.1} KB", b as f64 / 1024.0),
    }
}
