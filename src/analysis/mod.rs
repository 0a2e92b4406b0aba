//! Audio analysis modules
//!
//! This module provides traits for analysis backends and concrete implementations.
//! The trait abstraction allows swapping backends without changing pipeline code.

pub mod gemini;
pub mod prompt;
pub mod traits;

pub use traits::{Analyzer, PromptProvider};

pub use gemini::{mime_type_for, GeminiAnalyzer};
pub use prompt::{prompt_for, EnglishPrompt, PersianPrompt, PromptLanguage, StaticPrompt};
