//! Batch statistics

use crate::types::AnalysisOutcome;
use serde::Serialize;
use std::time::Duration;

/// Files analyzed faster than this count as fast
pub const FAST_THRESHOLD_SECS: f64 = 10.0;
/// Files analyzed slower than this count as slow
pub const SLOW_THRESHOLD_SECS: f64 = 30.0;

/// Overall grade of a batch, derived from its success rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchHealth {
    /// Nothing was processed
    Idle,
    /// At least 90% succeeded
    Healthy,
    /// At least 70% succeeded
    Degraded,
    /// Less than 70% succeeded
    Failing,
}

impl BatchHealth {
    fn from_rate(total: usize, success_rate: f64) -> Self {
        if total == 0 {
            BatchHealth::Idle
        } else if success_rate >= 90.0 {
            BatchHealth::Healthy
        } else if success_rate >= 70.0 {
            BatchHealth::Degraded
        } else {
            BatchHealth::Failing
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BatchHealth::Idle => "Idle",
            BatchHealth::Healthy => "Healthy",
            BatchHealth::Degraded => "Degraded",
            BatchHealth::Failing => "Needs attention",
        }
    }
}

/// How many files fell into each processing-time bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeedBreakdown {
    pub fast: usize,
    pub medium: usize,
    pub slow: usize,
}

/// Aggregate statistics over one batch of outcomes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    /// Percentage of successful files (0.0 for an empty batch)
    pub success_rate: f64,
    pub total_elapsed_secs: f64,
    /// Mean processing time per file (0.0 for an empty batch)
    pub mean_elapsed_secs: f64,
    /// Words across all result texts
    pub total_words: usize,
    /// Mean words per successful file
    pub mean_words: f64,
    /// Sum of known input sizes
    pub total_bytes: u64,
    pub speed: SpeedBreakdown,
    pub health: BatchHealth,
}

impl BatchSummary {
    /// Compute statistics for a sequence of outcomes
    ///
    /// Total for every input, including an empty slice.
    pub fn from_outcomes(outcomes: &[AnalysisOutcome]) -> Self {
        let total = outcomes.len();
        let successful = outcomes.iter().filter(|o| o.is_success()).count();
        let failed = total - successful;

        let success_rate = ratio(successful as f64 * 100.0, total);

        let total_elapsed: Duration = outcomes.iter().map(|o| o.elapsed()).sum();
        let total_elapsed_secs = total_elapsed.as_secs_f64();
        let mean_elapsed_secs = ratio(total_elapsed_secs, total);

        let total_words: usize = outcomes.iter().map(|o| o.word_count()).sum();
        let mean_words = ratio(total_words as f64, successful);
        let total_bytes = outcomes.iter().filter_map(|o| o.record().size_bytes).sum();

        let mut speed = SpeedBreakdown::default();
        for outcome in outcomes {
            let secs = outcome.elapsed().as_secs_f64();
            if secs < FAST_THRESHOLD_SECS {
                speed.fast += 1;
            } else if secs < SLOW_THRESHOLD_SECS {
                speed.medium += 1;
            } else {
                speed.slow += 1;
            }
        }

        Self {
            total,
            successful,
            failed,
            success_rate,
            total_elapsed_secs,
            mean_elapsed_secs,
            total_words,
            mean_words,
            total_bytes,
            speed,
            health: BatchHealth::from_rate(total, success_rate),
        }
    }

    /// Share of the batch in a speed bucket, as a percentage
    pub fn speed_share(&self, count: usize) -> f64 {
        ratio(count as f64 * 100.0, self.total)
    }
}

// Guard against division by zero
fn ratio(numerator: f64, denominator: usize) -> f64 {
    if denominator > 0 {
        numerator / denominator as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AudioFileRecord;
    use std::sync::Arc;

    fn outcome(name: &str, ok: bool, secs: f64) -> AnalysisOutcome {
        let record = Arc::new(AudioFileRecord::from_path(format!("/in/{}", name), Some(1024)));
        let elapsed = Duration::from_secs_f64(secs);
        if ok {
            AnalysisOutcome::succeeded(record, "one two three".into(), elapsed)
        } else {
            AnalysisOutcome::failed(record, "boom".into(), elapsed)
        }
    }

    #[test]
    fn test_empty_batch() {
        let summary = BatchSummary::from_outcomes(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.mean_elapsed_secs, 0.0);
        assert_eq!(summary.mean_words, 0.0);
        assert_eq!(summary.health, BatchHealth::Idle);
    }

    #[test]
    fn test_all_failed() {
        let outcomes = vec![outcome("a.mp3", false, 1.0), outcome("b.mp3", false, 3.0)];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.success_rate, 0.0);
        assert_eq!(summary.mean_words, 0.0);
        assert!((summary.mean_elapsed_secs - 2.0).abs() < 1e-9);
        assert_eq!(summary.health, BatchHealth::Failing);
    }

    #[test]
    fn test_mixed_batch() {
        let outcomes = vec![
            outcome("a.mp3", true, 2.0),
            outcome("b.mp3", false, 12.0),
            outcome("c.mp3", true, 40.0),
        ];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful + summary.failed, summary.total);
        assert!((summary.success_rate - 66.666_666).abs() < 0.01);
        assert!((summary.total_elapsed_secs - 54.0).abs() < 1e-9);
        assert!((summary.mean_elapsed_secs - 18.0).abs() < 1e-9);
        assert_eq!(summary.total_words, 6);
        assert!((summary.mean_words - 3.0).abs() < 1e-9);
        assert_eq!(summary.total_bytes, 3 * 1024);
        assert_eq!(summary.speed, SpeedBreakdown { fast: 1, medium: 1, slow: 1 });
        assert_eq!(summary.health, BatchHealth::Failing);
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let outcomes = vec![outcome("a.mp3", true, 1.0), outcome("b.mp3", true, 2.0)];
        let first = BatchSummary::from_outcomes(&outcomes);
        let second = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(first, second);
        assert_eq!(first.health, BatchHealth::Healthy);
    }
}
