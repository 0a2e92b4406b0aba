//! Analysis trait abstractions
//!
//! These traits define the interface for swappable analysis backends.
//! Current implementation sends audio to Gemini over its REST API.

use crate::error::Result;
use crate::types::AudioFileRecord;

/// Transcription/analysis backend
///
/// Invoked once per file. A returned error (or a panic) is recorded as a
/// failed outcome by the orchestrator and never aborts the batch.
pub trait Analyzer {
    /// Analyze one audio file and return the report text
    fn analyze(&self, record: &AudioFileRecord) -> Result<String>;

    /// Get the name of this analyzer (for logging)
    fn name(&self) -> &str;
}

/// Supplier of the instruction text sent along with each recording
pub trait PromptProvider: Send + Sync {
    /// Get the prompt for audio analysis
    fn analysis_prompt(&self) -> String;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, record: &AudioFileRecord) -> Result<String> {
        (**self).analyze(record)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, record: &AudioFileRecord) -> Result<String> {
        (**self).analyze(record)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
