//! Dry run mode - show files that would be analyzed without processing

use crate::config::{ConfigurationSource, Settings};
use crate::discovery;
use crate::export;
use crate::types::AudioFileRecord;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Rough per-file estimate for a Gemini round trip
const ESTIMATED_SECS_PER_FILE: usize = 15;

/// What a real run would do
#[derive(Debug)]
pub struct DryRunPlan {
    pub files: Vec<AudioFileRecord>,
    /// Files grouped by parent directory
    pub by_directory: BTreeMap<PathBuf, Vec<String>>,
    /// File count per format tag, most common first
    pub by_format: Vec<(String, usize)>,
    /// Artifacts that would be written
    pub artifacts: Vec<PathBuf>,
}

/// Discover files and work out the artifacts, without analyzing anything
pub fn plan_dry_run(settings: &Settings) -> DryRunPlan {
    let files = discovery::scan(&settings.input, settings.supported_extensions());
    let ext = export::persister_for(settings.report_format).extension();

    let mut by_directory: BTreeMap<PathBuf, Vec<String>> = BTreeMap::new();
    let mut formats: BTreeMap<String, usize> = BTreeMap::new();
    for file in &files {
        let dir = file.path.parent().unwrap_or(&file.path).to_path_buf();
        by_directory.entry(dir).or_default().push(file.name.clone());
        *formats.entry(file.format.to_uppercase()).or_default() += 1;
    }

    let mut by_format: Vec<_> = formats.into_iter().collect();
    by_format.sort_by(|a, b| b.1.cmp(&a.1));

    let mut artifacts = export::outcome_paths(&settings.output, &files, ext);
    if !files.is_empty() {
        artifacts.push(export::summary_path(&settings.output, ext));
    }

    DryRunPlan {
        files,
        by_directory,
        by_format,
        artifacts,
    }
}

impl DryRunPlan {
    /// Print the plan to stdout
    pub fn print(&self) {
        println!();
        println!("=== DRY RUN MODE ===");
        println!();

        for (dir, names) in &self.by_directory {
            println!("{}/ ({} files)", dir.display(), names.len());
            for name in names {
                println!("  {}", name);
            }
            println!();
        }

        println!("─────────────────────────────────────────");
        println!();
        println!("Would analyze {} files:", self.files.len());
        for (format, count) in &self.by_format {
            println!("  {} {} files", count, format);
        }
        println!();

        let estimate_secs = self.files.len() * ESTIMATED_SECS_PER_FILE;
        print!("Estimated time: ");
        if estimate_secs >= 60 {
            print!("{}m ", estimate_secs / 60);
        }
        println!("{}s", estimate_secs % 60);

        println!();
        println!("Would create:");
        for artifact in &self.artifacts {
            println!("  {}", artifact.display());
        }
        println!();
    }
}
