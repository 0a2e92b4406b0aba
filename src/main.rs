//! voxbatch CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use voxbatch::analysis::{prompt_for, GeminiAnalyzer};
use voxbatch::config::{self, Cli, Settings};
use voxbatch::{export, pipeline};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(&cli);

    // Build settings from CLI
    let settings = Settings::from_cli(&cli);

    // Dry run mode - list files and exit, no API key needed
    if settings.dry_run {
        pipeline::plan_dry_run(&settings).print();
        return ExitCode::SUCCESS;
    }

    if let Err(e) = config::validate(&settings) {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    let analyzer = match GeminiAnalyzer::from_config(&settings, prompt_for(settings.language)) {
        Ok(analyzer) => analyzer,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let persister = export::persister_for(settings.report_format);

    // Run the pipeline
    match pipeline::run(&settings, &analyzer, persister.as_ref()) {
        Ok(report) => {
            print_summary(&report);

            if report.summary.failed > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        tracing::Level::ERROR
    } else {
        cli.log_level()
    };
    let filter = level.as_str().to_lowercase();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn print_summary(report: &voxbatch::BatchReport) {
    let summary = &report.summary;
    println!();

    if summary.total == 0 {
        println!("No audio files found to process.");
        return;
    }

    for outcome in &report.outcomes {
        match outcome.error_message() {
            None => println!("  ✓ {}", outcome.record().name),
            Some(error) => println!("  ✗ {}: {}", outcome.record().name, error),
        }
    }

    println!();
    println!("Summary:");
    println!("  Total files:     {}", summary.total);
    println!("  Succeeded:       {}", summary.successful);
    println!("  Failed:          {}", summary.failed);
    println!("  Success rate:    {:.1}%", summary.success_rate);
    println!("  Total time:      {:.2}s", summary.total_elapsed_secs);
    println!("  Mean time:       {:.2}s", summary.mean_elapsed_secs);
    if let Some(path) = &report.summary_path {
        println!();
        println!("Reports written to {}", path.parent().unwrap_or(path).display());
    }
}
