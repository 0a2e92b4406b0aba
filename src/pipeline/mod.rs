//! Pipeline orchestration
//!
//! Coordinates configuration checks, file discovery, sequential analysis,
//! aggregation, and report export.

pub mod dry_run;
pub mod orchestrator;
pub mod summary;

pub use dry_run::{plan_dry_run, DryRunPlan};
pub use orchestrator::Orchestrator;
pub use summary::{BatchHealth, BatchSummary, SpeedBreakdown};

use crate::analysis::Analyzer;
use crate::config::{self, ConfigurationSource, Settings};
use crate::discovery;
use crate::error::Result;
use crate::export::{self, ReportPersister};
use crate::types::AnalysisOutcome;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// Everything a finished batch produced
#[derive(Debug)]
pub struct BatchReport {
    /// One outcome per discovered file, in discovery order
    pub outcomes: Vec<AnalysisOutcome>,
    pub summary: BatchSummary,
    /// Summary artifact, `None` when nothing was found
    pub summary_path: Option<PathBuf>,
}

/// Run the full pipeline
///
/// Configuration is checked before anything else, so a configuration error
/// leaves the output directory untouched. An empty batch writes no reports.
pub fn run(
    settings: &Settings,
    analyzer: &dyn Analyzer,
    persister: &dyn ReportPersister,
) -> Result<BatchReport> {
    let pipeline_start = Instant::now();

    config::validate(settings)?;

    // Phase 1: Discovery
    info!("Scanning {} for audio files...", settings.input.display());
    let files = discovery::scan(&settings.input, settings.supported_extensions());

    if files.is_empty() {
        return Ok(BatchReport {
            outcomes: Vec::new(),
            summary: BatchSummary::from_outcomes(&[]),
            summary_path: None,
        });
    }

    // Phase 2: Analysis
    let mut outcomes = Orchestrator::new(analyzer)
        .with_progress(settings.show_progress)
        .process(files);
    let summary = BatchSummary::from_outcomes(&outcomes);

    info!(
        "Analysis finished: {} succeeded, {} failed ({:.1}%)",
        summary.successful, summary.failed, summary.success_rate
    );

    // Phase 3: Export
    let summary_path = persist(&mut outcomes, &summary, persister, &settings.output)?;

    info!(
        "Total pipeline time: {:.2}s",
        pipeline_start.elapsed().as_secs_f64()
    );

    Ok(BatchReport {
        outcomes,
        summary,
        summary_path: Some(summary_path),
    })
}

/// Write one report per outcome, then the summary
///
/// Every outcome gets its own artifact, even when two inputs share a file
/// stem (see [`export::outcome_paths`]). Stops at the first write failure.
/// The outcomes stay with the caller, so a failed export can be retried
/// without analyzing again.
pub fn persist(
    outcomes: &mut [AnalysisOutcome],
    summary: &BatchSummary,
    persister: &dyn ReportPersister,
    output_dir: &Path,
) -> Result<PathBuf> {
    export::ensure_output_dir(output_dir)?;

    let paths = export::outcome_paths(
        output_dir,
        outcomes.iter().map(|o| o.record()),
        persister.extension(),
    );
    for (outcome, path) in outcomes.iter_mut().zip(&paths) {
        if let Err(e) = persister.save_outcome_to(outcome, path) {
            error!("Failed to save report for {}: {}", outcome.record().name, e);
            return Err(e);
        }
    }

    let path = persister.save_summary(outcomes, summary, output_dir)?;
    if summary.failed > 0 {
        warn!(
            "{} of {} files failed, see {}",
            summary.failed,
            summary.total,
            path.display()
        );
    }
    Ok(path)
}
