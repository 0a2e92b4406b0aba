//! Batch orchestration
//!
//! Runs the analyzer over every discovered file, one at a time, and turns
//! each attempt into exactly one outcome. A failing file never stops the
//! batch: errors and panics from the analyzer become failed outcomes.

use crate::analysis::Analyzer;
use crate::error::{Result, VoxError};
use crate::types::{AnalysisOutcome, AudioFileRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Drives one batch through an analyzer
pub struct Orchestrator<'a> {
    analyzer: &'a dyn Analyzer,
    show_progress: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(analyzer: &'a dyn Analyzer) -> Self {
        Self {
            analyzer,
            show_progress: false,
        }
    }

    /// Show a progress bar while processing
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Analyze every record in order
    ///
    /// Returns one outcome per record, in the same order. Each file is
    /// attempted once; there are no retries.
    pub fn process(&self, records: Vec<AudioFileRecord>) -> Vec<AnalysisOutcome> {
        if records.is_empty() {
            debug!("Nothing to analyze");
            return Vec::new();
        }

        let total = records.len();
        info!("Analyzing {} files with {}", total, self.analyzer.name());

        let progress_bar = self.progress_bar(total);
        let mut outcomes = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let record = Arc::new(record);
            debug!("Processing {}/{}: {}", index + 1, total, record.name);

            if let Some(ref pb) = progress_bar {
                pb.set_message(record.name.clone());
            }

            let (result, elapsed) = self.analyze_one(&record);
            let outcome = match result {
                Ok(text) => {
                    info!(
                        "Analyzed {} in {:.2}s",
                        record.name,
                        elapsed.as_secs_f64()
                    );
                    AnalysisOutcome::succeeded(record, text, elapsed)
                }
                Err(e) => {
                    let message = format!("Failed to analyze '{}': {}", record.name, e);
                    if e.is_recoverable() {
                        warn!("{}", message);
                    } else {
                        // Not specific to this file
                        error!("{}", message);
                    }
                    AnalysisOutcome::failed(record, message, elapsed)
                }
            };
            outcomes.push(outcome);

            if let Some(ref pb) = progress_bar {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress_bar {
            pb.finish_with_message("Analysis complete");
        }

        outcomes
    }

    /// Run the analyzer on one record and time the call
    ///
    /// A panic inside the analyzer is reported as an error for this file.
    fn analyze_one(&self, record: &AudioFileRecord) -> (Result<String>, Duration) {
        let start = Instant::now();
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.analyzer.analyze(record)));
        let elapsed = start.elapsed();

        let result = match result {
            Ok(result) => result,
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "unknown panic".to_string()
                };
                Err(VoxError::analysis_error(
                    &record.path,
                    format!("analyzer panicked: {}", panic_msg),
                ))
            }
        };

        (result, elapsed)
    }

    fn progress_bar(&self, total: usize) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Replays a fixed list of responses, one per call
    struct Scripted {
        responses: RefCell<Vec<std::result::Result<&'static str, &'static str>>>,
        seen: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<std::result::Result<&'static str, &'static str>>) -> Self {
            Self {
                responses: RefCell::new(responses.into_iter().rev().collect()),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl Analyzer for Scripted {
        fn analyze(&self, record: &AudioFileRecord) -> Result<String> {
            self.seen.borrow_mut().push(record.name.clone());
            match self.responses.borrow_mut().pop() {
                Some(Ok(text)) => Ok(text.to_string()),
                Some(Err(reason)) => Err(VoxError::analysis_error(&record.path, reason)),
                None => panic!("no scripted response left"),
            }
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn records(names: &[&str]) -> Vec<AudioFileRecord> {
        names
            .iter()
            .map(|n| AudioFileRecord::from_path(format!("/in/{}", n), None))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_no_outcomes() {
        let analyzer = Scripted::new(vec![]);
        let outcomes = Orchestrator::new(&analyzer).process(Vec::new());
        assert!(outcomes.is_empty());
        assert!(analyzer.seen.borrow().is_empty());
    }

    #[test]
    fn test_failure_is_isolated_and_order_kept() {
        let analyzer = Scripted::new(vec![Ok("A"), Err("boom"), Ok("B")]);
        let outcomes = Orchestrator::new(&analyzer).process(records(&["1.mp3", "2.mp3", "3.mp3"]));

        let flags: Vec<_> = outcomes.iter().map(|o| o.is_success()).collect();
        assert_eq!(flags, vec![true, false, true]);
        let names: Vec<_> = outcomes.iter().map(|o| o.record().name.as_str()).collect();
        assert_eq!(names, vec!["1.mp3", "2.mp3", "3.mp3"]);

        assert_eq!(outcomes[0].result_text(), "A");
        let message = outcomes[1].error_message().unwrap();
        assert!(message.contains("boom"));
        assert!(message.contains("2.mp3"));
        assert_eq!(outcomes[2].result_text(), "B");
        assert_eq!(*analyzer.seen.borrow(), vec!["1.mp3", "2.mp3", "3.mp3"]);
    }

    /// Fails every call with an error that is not tied to one file
    struct Rejected;

    impl Analyzer for Rejected {
        fn analyze(&self, _record: &AudioFileRecord) -> Result<String> {
            Err(VoxError::config_error("API key rejected"))
        }

        fn name(&self) -> &str {
            "rejected"
        }
    }

    #[test]
    fn test_fatal_analyzer_error_still_attempts_every_file() {
        let outcomes = Orchestrator::new(&Rejected).process(records(&["1.mp3", "2.mp3"]));

        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert!(!outcome.is_success());
            assert!(outcome.error_message().unwrap().contains("API key rejected"));
        }
    }

    #[test]
    fn test_panic_becomes_failed_outcome() {
        // Only one response scripted: the second call panics
        let analyzer = Scripted::new(vec![Ok("A")]);
        let outcomes = Orchestrator::new(&analyzer).process(records(&["1.wav", "2.wav"]));

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[1]
            .error_message()
            .unwrap()
            .contains("no scripted response left"));
    }
}
