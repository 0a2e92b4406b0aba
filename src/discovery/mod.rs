//! Audio file discovery

pub mod scanner;

pub use scanner::{discover_file, is_supported, scan};
