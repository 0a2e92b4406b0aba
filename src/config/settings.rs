//! Runtime configuration settings

use super::ConfigurationSource;
use crate::analysis::PromptLanguage;
use crate::export::ReportFormat;
use std::path::PathBuf;

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Extensions accepted when nothing else is configured
pub const DEFAULT_EXTENSIONS: [&str; 6] = ["mp3", "wav", "aiff", "aac", "ogg", "flac"];

/// Runtime settings for a batch run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory containing the recordings
    pub input: PathBuf,
    /// Output directory for reports
    pub output: PathBuf,
    /// Gemini API key
    pub api_key: Option<String>,
    /// Gemini model name
    pub model_name: String,
    /// Prompt language
    pub language: PromptLanguage,
    /// Report format
    pub report_format: ReportFormat,
    /// Show progress bars
    pub show_progress: bool,
    /// Dry run mode - list files without processing
    pub dry_run: bool,
    /// Supported extensions, lower-case without leading dot
    supported_extensions: Vec<String>,
}

impl Settings {
    /// Create settings from CLI arguments
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        let mut settings = Self {
            input: cli.input.clone(),
            output: cli.output.clone(),
            api_key: cli.api_key.clone(),
            model_name: cli.model.clone(),
            language: cli.language,
            report_format: cli.format,
            show_progress: !cli.quiet,
            dry_run: cli.dry_run,
            ..Self::default()
        };

        for ext in &cli.extensions {
            settings.add_supported_extension(ext);
        }

        settings
    }

    /// Set a new API key
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = Some(api_key.into());
    }

    /// Set a new model name
    pub fn set_model_name(&mut self, model_name: impl Into<String>) {
        self.model_name = model_name.into();
    }

    /// Add an extension to this instance's supported set
    ///
    /// The extension is lower-cased and stripped of a leading dot; adding an
    /// extension that is already present is a no-op.
    pub fn add_supported_extension(&mut self, extension: &str) {
        let normalized = extension.trim().trim_start_matches('.').to_lowercase();
        if normalized.is_empty() || self.supported_extensions.contains(&normalized) {
            return;
        }
        self.supported_extensions.push(normalized);
    }

    /// Replace the supported set
    pub fn set_supported_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.supported_extensions.clear();
        for ext in extensions {
            self.add_supported_extension(ext.as_ref());
        }
    }
}

impl ConfigurationSource for Settings {
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn supported_extensions(&self) -> &[String] {
        &self.supported_extensions
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input: PathBuf::from("assets/voice"),
            output: PathBuf::from("results"),
            api_key: None,
            model_name: DEFAULT_MODEL.to_string(),
            language: PromptLanguage::English,
            report_format: ReportFormat::Markdown,
            show_progress: true,
            dry_run: false,
            supported_extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}
