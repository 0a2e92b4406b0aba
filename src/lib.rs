//! voxbatch - Batch Transcription & Analysis of Audio Recordings
//!
//! A command-line utility that sends every recording in a directory to an
//! AI analysis backend and writes one report per file plus a summary.
//!
//! # Architecture
//!
//! The library is organized into several key modules:
//!
//! - `config`: CLI argument parsing, runtime settings and validation
//! - `discovery`: Recursive scanning for supported audio files
//! - `analysis`: Analyzer and prompt traits, Gemini backend
//! - `pipeline`: Sequential orchestration with per-file failure isolation
//! - `export`: Markdown and JSON reports
//!
//! # Example
//!
//! ```no_run
//! use voxbatch::analysis::{prompt_for, GeminiAnalyzer};
//! use voxbatch::{config::Settings, export, pipeline};
//!
//! let mut settings = Settings::default();
//! settings.set_api_key("my-key");
//! let analyzer = GeminiAnalyzer::from_config(&settings, prompt_for(settings.language))
//!     .expect("Invalid configuration");
//! let persister = export::persister_for(settings.report_format);
//! let report = pipeline::run(&settings, &analyzer, persister.as_ref()).expect("Run failed");
//! println!("Analyzed {} files", report.summary.successful);
//! ```

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod types;

// Re-export key types at crate root
pub use error::{Result, VoxError};
pub use pipeline::{BatchReport, BatchSummary};
pub use types::{AnalysisOutcome, AudioFileRecord};
