//! CLI argument parsing and configuration

use crate::analysis::PromptLanguage;
use crate::export::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// voxbatch - Batch transcription and analysis of audio recordings
///
/// Sends every supported audio file under the input directory to Gemini and
/// writes one report per file plus a summary report.
#[derive(Parser, Debug)]
#[command(name = "voxbatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing the recordings (searched recursively)
    #[arg(short, long, value_name = "DIR")]
    pub input: PathBuf,

    /// Output directory for reports
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    pub output: PathBuf,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(short, long, env = "GEMINI_MODEL_NAME", default_value = "gemini-2.0-flash")]
    pub model: String,

    /// Language of the analysis prompt
    #[arg(short, long, value_enum, default_value = "english")]
    pub language: PromptLanguage,

    /// Report format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: ReportFormat,

    /// Additional file extension to accept (can be repeated)
    #[arg(short = 'e', long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress progress bars)
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Dry run - list files that would be analyzed without calling the API
    #[arg(long, default_value = "false")]
    pub dry_run: bool,
}

impl Cli {
    /// Get the log level based on verbosity flags
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_args() {
        let cli = Cli::try_parse_from(["voxbatch", "-i", "assets/voice", "--api-key", "k"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("assets/voice"));
        assert_eq!(cli.output, PathBuf::from("results"));
        assert_eq!(cli.format, ReportFormat::Markdown);
        assert_eq!(cli.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_parse_repeated_extensions() {
        let cli = Cli::try_parse_from([
            "voxbatch", "-i", "in", "-e", "m4a", "-e", ".opus", "-f", "json", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.extensions, vec!["m4a", ".opus"]);
        assert_eq!(cli.format, ReportFormat::Json);
        assert_eq!(cli.log_level(), tracing::Level::DEBUG);
    }
}
