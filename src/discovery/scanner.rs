//! File discovery and scanning

use crate::types::{format_tag, AudioFileRecord};
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Scan a directory tree for audio files with a supported extension
///
/// Entries are visited in file-name order, so an unchanged tree always
/// yields the same sequence. Hidden files and directories (names starting
/// with `.`, such as `._call.mp3` or `.Trash`) are skipped. A missing root
/// is not an error: it simply contains no files.
pub fn scan(root: &Path, extensions: &[String]) -> Vec<AudioFileRecord> {
    if !root.is_dir() {
        warn!("Input directory not found: {}", root.display());
        return Vec::new();
    }

    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));
    for entry in walker.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_supported(path, extensions) {
            continue;
        }
        if let Some(record) = build_record(path) {
            debug!("Discovered: {}", record.path.display());
            files.push(record);
        }
    }

    info!("Discovered {} audio files", files.len());

    if files.is_empty() {
        warn!("No supported audio files found in {}", root.display());
    }

    files
}

/// Validate a single path and build its record
///
/// Returns `None` when the extension is not supported or the file cannot
/// be read.
pub fn discover_file(path: &Path, extensions: &[String]) -> Option<AudioFileRecord> {
    let hidden = path.file_name().map(is_hidden).unwrap_or(false);
    if hidden || !path.is_file() || !is_supported(path, extensions) {
        return None;
    }
    build_record(path)
}

/// Check whether a path's extension is in the supported set (case-insensitive)
pub fn is_supported(path: &Path, extensions: &[String]) -> bool {
    let tag = format_tag(path);
    !tag.is_empty() && extensions.iter().any(|e| e.eq_ignore_ascii_case(&tag))
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Create a record if the file is still present and readable
fn build_record(path: &Path) -> Option<AudioFileRecord> {
    // The file may have disappeared since it was listed
    if let Err(e) = File::open(path) {
        debug!("Skipping unreadable file {}: {}", path.display(), e);
        return None;
    }

    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let size_bytes = std::fs::metadata(path).ok().map(|m| m.len());

    Some(AudioFileRecord::from_path(absolute, size_bytes))
}
